//! Handlers attached to interactive ("on") shapes: drag, hover and double-click.
//!
//! Dragging a shape moves its whole group. Releasing it over the trash target
//! deletes the group instead.

use slicemark_core::{DrawError, DrawEvent, DrawEventKind, Point2D, Result};

use super::DrawTool;
use crate::commands::{translate_children, Command, DrawCommand};
use crate::host::{CursorStyle, DragEvent, DrawHost};
use crate::scene::{NodeId, NodeRole, NodeSpec, Scene};

/// State captured at drag start.
#[derive(Debug, Clone)]
pub(crate) struct DragSession {
    shape: NodeId,
    start: Point2D,
    last: Option<Point2D>,
    colour: Option<String>,
}

/// Result of a drag gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragOutcome {
    /// Group moved by the given translation.
    Moved(Point2D),
    /// Group released over the trash and deleted.
    Deleted,
    /// Released where it started.
    Unchanged,
}

impl<H: DrawHost> DrawTool<H> {
    /// Trash group, while a drag is in progress.
    pub fn trash(&self) -> Option<NodeId> {
        self.trash
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Position of the trash target for the current view.
    pub fn trash_position(&self) -> Point2D {
        let settings = &self.config.trash;
        self.host
            .viewport()
            .screen_anchor(settings.offset_x, settings.offset_y)
    }

    fn on_trash(&self, offset: Point2D) -> bool {
        self.trash_position()
            .within_square(&self.real_position(offset), self.config.trash.threshold)
    }

    fn trash_spec(&self) -> NodeSpec {
        let arm = self.config.trash.arm_length;
        let colour = &self.config.trash.colour;
        let mut spec = NodeSpec::group(NodeRole::Trash, "trash")
            .with_child(NodeSpec::path(
                NodeRole::Decoration,
                vec![Point2D::new(-arm, -arm), Point2D::new(arm, arm)],
                false,
                colour.clone(),
            ))
            .with_child(NodeSpec::path(
                NodeRole::Decoration,
                vec![Point2D::new(-arm, arm), Point2D::new(arm, -arm)],
                false,
                colour.clone(),
            ));
        spec.position = self.trash_position();
        spec
    }

    pub(crate) fn remove_trash(&mut self, scene: &mut Scene) -> Result<()> {
        if let Some(trash) = self.trash.take() {
            if scene.contains(trash) {
                scene.destroy(trash)?;
            }
        }
        Ok(())
    }

    /// Starts dragging an interactive shape and shows the trash.
    pub fn drag_start(&mut self, shape: NodeId) -> Result<()> {
        self.require_interactive(shape)?;
        let stage = self.host.draw_stage();
        let layer = self.layer();
        let inverse_scale = self.host.viewport().inverse_scale();
        let spec = self.trash_spec();
        {
            let mut scene = stage.borrow_mut();
            let node = scene.node(shape)?;
            let session = DragSession {
                shape,
                start: node.position(),
                last: None,
                colour: node.stroke().map(str::to_string),
            };
            self.remove_trash(&mut scene)?;
            let trash = scene.instantiate(&spec);
            scene.set_scale(trash, inverse_scale)?;
            scene.set_listening(trash, false)?;
            scene.add(layer, trash)?;
            self.trash = Some(trash);
            self.drag = Some(session);
        }
        // anchors would react to a shape that is about to move
        self.editor.set_anchors_active(false);
        tracing::debug!("Drag started on {}", shape);
        Ok(())
    }

    /// Applies the drag engine's new position and drags the rest of the group along.
    pub fn drag_move(&mut self, event: &DragEvent) -> Result<()> {
        let Some(session) = self.drag.as_mut() else {
            tracing::warn!("Drag move without drag start");
            return Ok(());
        };
        let shape = session.shape;
        let translation = event.position - session.last.unwrap_or(session.start);
        session.last = Some(event.position);
        let colour = session.colour.clone();

        let on_trash = self.on_trash(event.offset);
        let trash_settings = &self.config.trash;
        let stage = self.host.draw_stage();
        let mut scene = stage.borrow_mut();
        scene.set_position(shape, event.position)?;

        if let Some(trash) = self.trash {
            let (trash_colour, shape_colour) = if on_trash {
                (&trash_settings.highlight_colour, Some(trash_settings.warning_colour.clone()))
            } else {
                (&trash_settings.colour, colour)
            };
            for line in scene.children(trash)?.to_vec() {
                scene.set_stroke(line, Some(trash_colour.clone()))?;
            }
            scene.set_stroke(shape, shape_colour)?;
        }

        translate_siblings(&mut scene, shape, translation)?;
        self.editor.reset_anchors(&scene)?;
        Ok(())
    }

    /// Ends the drag: delete when released over the trash, else record a move.
    pub fn drag_end(&mut self, event: &DragEvent) -> Result<DragOutcome> {
        let Some(session) = self.drag.take() else {
            tracing::warn!("Drag end without drag start");
            return Ok(DragOutcome::Unchanged);
        };
        let shape = session.shape;
        let on_trash = self.on_trash(event.offset);
        let stage = self.host.draw_stage();

        let (group, display_name) = {
            let mut scene = stage.borrow_mut();
            // catch up with a final position the drag engine did not report as a move
            let remaining = event.position - session.last.unwrap_or(session.start);
            scene.set_position(shape, event.position)?;
            translate_siblings(&mut scene, shape, remaining)?;
            self.remove_trash(&mut scene)?;
            scene.set_stroke(shape, session.colour.clone())?;
            let group = scene.parent(shape)?.ok_or_else(|| DrawError::UnknownNode {
                node: format!("{} has no group", shape),
            })?;
            (group, self.display_name_of(&scene, group))
        };
        let translation = event.position - session.start;

        if on_trash {
            // the group goes back to its pre-drag position before deletion
            translate_children(&mut stage.borrow_mut(), group, -translation)?;
            self.unbind_editor()?;
            self.host.set_cursor(CursorStyle::Default);
            let mut cmd = DrawCommand::delete(group, display_name).with_hooks(self.hooks());
            cmd.execute(&stage)?;
            self.host.push_undo(cmd);
            tracing::debug!("Shape {} dropped on trash", shape);
            return Ok(DragOutcome::Deleted);
        }

        let outcome = match DrawCommand::translate(group, translation, display_name.as_str()) {
            Some(cmd) => {
                // already applied by the drag, so only recorded
                let cmd = cmd.with_hooks(self.hooks());
                self.host.push_undo(cmd);
                let tag = stage.borrow().node(group)?.tag().map(str::to_string);
                let event = match tag {
                    Some(id) => DrawEvent::for_group(DrawEventKind::Move, id, display_name),
                    None => DrawEvent::new(DrawEventKind::Move),
                };
                self.fire(&event);
                DragOutcome::Moved(translation)
            }
            None => DragOutcome::Unchanged,
        };
        self.editor.set_anchors_active(true);
        self.editor.reset_anchors(&stage.borrow())?;
        Ok(outcome)
    }

    /// Pointer entered an interactive shape.
    pub fn pointer_over(&mut self, shape: NodeId) {
        if self.is_shape_on(shape) {
            self.host.set_cursor(CursorStyle::Pointer);
        }
    }

    /// Pointer left an interactive shape.
    pub fn pointer_leave(&mut self, shape: NodeId) {
        if self.is_shape_on(shape) {
            self.host.set_cursor(CursorStyle::Default);
        }
    }

    /// Prompts for a new label expression. Returns true if the label changed.
    pub fn double_click(&mut self, shape: NodeId) -> Result<bool> {
        self.require_interactive(shape)?;
        let stage = self.host.draw_stage();
        let (label, current, group_id, display_name) = {
            let scene = stage.borrow();
            let group = scene.parent(shape)?.ok_or_else(|| DrawError::UnknownNode {
                node: format!("{} has no group", shape),
            })?;
            let group_id = scene
                .node(group)?
                .tag()
                .map_or_else(|| group.to_string(), str::to_string);
            let labels = scene.children_by_role(group, NodeRole::Label)?;
            let &[label] = labels.as_slice() else {
                return Err(DrawError::LabelInvariant {
                    group: group_id,
                    found: labels.len(),
                }
                .into());
            };
            let current = scene
                .node(label)?
                .label()
                .map(|l| l.text_expr.clone())
                .unwrap_or_default();
            (label, current, group_id, self.display_name_of(&scene, group))
        };

        let Some(text) = self.host.prompt_label("Shape label", &current) else {
            return Ok(false);
        };
        if text == current {
            return Ok(false);
        }
        stage.borrow_mut().label_mut(label)?.set_text_expr(text);
        self.fire(&DrawEvent::for_group(DrawEventKind::Change, group_id, display_name));
        Ok(true)
    }
}

fn translate_siblings(scene: &mut Scene, shape: NodeId, translation: Point2D) -> Result<()> {
    if translation.is_zero() {
        return Ok(());
    }
    let Some(group) = scene.parent(shape)? else {
        return Ok(());
    };
    for sibling in scene.children(group)?.to_vec() {
        if sibling != shape {
            scene.translate(sibling, translation)?;
        }
    }
    Ok(())
}
