//! Host-facing operations: display, layer rendering, clone and delete.

use slicemark_core::{DrawError, Result};
use uuid::Uuid;

use super::DrawTool;
use crate::commands::{Command, DrawCommand};
use crate::host::{CursorStyle, DrawHost, HostEventKind};
use crate::layout::{position_scope_id, resolve_or_create_scope, shape_groups_at};
use crate::scene::{NodeId, NodeRole};

impl<H: DrawHost> DrawTool<H> {
    /// Shows or hides the tool.
    ///
    /// Switching off abandons any gesture or drag in progress.
    pub fn display(&mut self, flag: bool) -> Result<()> {
        self.unbind_editor()?;
        self.host.set_cursor(CursorStyle::Default);
        if !flag {
            self.cancel_gesture()?;
            self.drag = None;
            let stage = self.host.draw_stage();
            self.remove_trash(&mut stage.borrow_mut())?;
        }
        {
            let stage = self.host.draw_stage();
            let mut scene = stage.borrow_mut();
            let root = scene.root();
            scene.set_listening(root, flag)?;
        }
        self.draw_layer = Some(self.host.current_draw_layer());
        self.render_draw_layer(flag)?;
        for kind in HostEventKind::ALL {
            if flag {
                self.host.add_host_listener(kind);
            } else {
                self.host.remove_host_listener(kind);
            }
        }
        tracing::info!("Draw tool display {}", if flag { "on" } else { "off" });
        Ok(())
    }

    /// Re-renders the layer; hosts call this on slice or frame change.
    pub fn update_draw_layer(&mut self) -> Result<()> {
        self.render_draw_layer(true)
    }

    /// Renders the draw layer for the current position.
    ///
    /// Only the current scope stays visible and its shapes are set on (or off).
    pub fn render_draw_layer(&mut self, visible: bool) -> Result<()> {
        let stage = self.host.draw_stage();
        let layer = self.layer();
        let scope_id = self.current_scope_id();
        let scope_tag = scope_id.to_string();

        let shapes = {
            let mut scene = stage.borrow_mut();
            scene.set_listening(layer, visible)?;
            scene.set_hit_graph_enabled(layer, visible)?;
            for group in scene.children_by_role(layer, NodeRole::PositionGroup)? {
                let current = scene.node(group)?.tag() == Some(scope_tag.as_str());
                scene.set_visible(group, current)?;
            }
            let mut shapes = Vec::new();
            for group in shape_groups_at(&scene, layer, &scope_id)? {
                // one shape per group
                if let Some(shape) = scene.child_by_role(group, NodeRole::Shape)? {
                    shapes.push(shape);
                }
            }
            shapes
        };

        // shapes of other scopes or detached annotations lose their handlers
        let stale: Vec<NodeId> = self
            .interactive
            .iter()
            .copied()
            .filter(|shape| !shapes.contains(shape))
            .collect();
        for shape in stale {
            self.set_shape_off(shape)?;
        }

        self.host.set_canvas_listening(visible);
        for shape in shapes {
            if visible {
                self.set_shape_on(shape)?;
            } else {
                self.set_shape_off(shape)?;
            }
        }
        tracing::debug!("Rendered {} (visible: {})", scope_tag, visible);
        Ok(())
    }

    /// Copies the selected annotation onto another slice.
    ///
    /// The copy gets a fresh id and keeps the label expression and values.
    /// With `restart`, the host returns to the original position afterwards.
    pub fn clone_draw(&mut self, layer: i64, restart: bool) -> Result<NodeId> {
        let slice_count = self.host.slice_count();
        let target = usize::try_from(layer)
            .ok()
            .filter(|k| *k < slice_count)
            .ok_or_else(|| {
                tracing::warn!("Rejected clone to layer {} of {}", layer, slice_count);
                DrawError::InvalidTarget {
                    reason: format!("layer {} is not available", layer),
                }
            })?;
        let shape = self.attached_selection(None)?;
        self.unbind_editor()?;

        let position = self.host.current_position();
        self.host.set_current_position(position.with_slice(target));

        let stage = self.host.draw_stage();
        let draw_layer = self.host.current_draw_layer();
        let scope_id = position_scope_id(target, self.host.current_frame());
        let (copy, scope, copy_shape, display_name) = {
            let mut scene = stage.borrow_mut();
            let group = scene.parent(shape)?.ok_or_else(|| DrawError::UnknownNode {
                node: format!("{} has no group", shape),
            })?;
            let (scope, _) = resolve_or_create_scope(&mut scene, draw_layer, &scope_id)?;
            let copy = scene.deep_clone(group)?;
            scene.set_tag(copy, Uuid::new_v4().to_string())?;
            let copy_shape = scene.child_by_role(copy, NodeRole::Shape)?;
            (copy, scope, copy_shape, self.display_name_of(&scene, group))
        };

        let mut cmd = DrawCommand::draw(copy, scope, draw_layer, display_name).with_hooks(self.hooks());
        cmd.execute(&stage)?;
        tracing::debug!("{} cloned to {}", cmd.name(), scope_id);
        self.host.push_undo(cmd);

        self.draw_layer = Some(draw_layer);
        if let Some(copy_shape) = copy_shape {
            self.set_shape_on(copy_shape)?;
        }
        self.render_draw_layer(true)?;

        if restart {
            self.host.set_current_position(position);
            self.render_draw_layer(true)?;
        }
        Ok(copy)
    }

    /// Parses a layer index typed by the user and clones onto it.
    pub fn clone_draw_from_input(&mut self, input: &str, restart: bool) -> Result<NodeId> {
        let value: f64 = input.trim().parse().map_err(|_| DrawError::InvalidTarget {
            reason: format!("'{}' is not a layer index", input),
        })?;
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(DrawError::InvalidTarget {
                reason: format!("'{}' is not a layer index", input),
            }
            .into());
        }
        self.clone_draw(value as i64, restart)
    }

    /// Deletes `shape`'s annotation, or the one bound to the editor.
    pub fn delete_draw(&mut self, shape: Option<NodeId>) -> Result<()> {
        let shape = self.attached_selection(shape)?;
        self.unbind_editor()?;

        let stage = self.host.draw_stage();
        let (group, display_name) = {
            let scene = stage.borrow();
            let group = scene.parent(shape)?.ok_or_else(|| DrawError::UnknownNode {
                node: format!("{} has no group", shape),
            })?;
            (group, self.display_name_of(&scene, group))
        };
        let mut cmd = DrawCommand::delete(group, display_name).with_hooks(self.hooks());
        cmd.execute(&stage)?;
        self.host.push_undo(cmd);
        Ok(())
    }

    /// `shape`, or the editor's shape, if it is still on the stage.
    ///
    /// An undone annotation stays bound to the editor; it is unbound here.
    fn attached_selection(&mut self, shape: Option<NodeId>) -> Result<NodeId> {
        let shape = shape
            .or_else(|| self.editor.shape())
            .ok_or(DrawError::NoSelection)?;
        if !self.host.draw_stage().borrow().is_attached(shape) {
            tracing::warn!("Selected shape {} is no longer on the stage", shape);
            if self.editor.shape() == Some(shape) {
                self.unbind_editor()?;
            }
            return Err(DrawError::NoSelection.into());
        }
        Ok(shape)
    }
}
