//! Point collection, live preview and finalization.

use slicemark_core::{Point2D, Result};
use std::mem;
use std::time::Duration;
use uuid::Uuid;

use super::DrawTool;
use crate::commands::{Command, DrawCommand};
use crate::host::{DrawHost, KeyEvent, PointerEvent};
use crate::layout::resolve_or_create_scope;
use crate::scene::{NodeId, NodeRole};

/// Synthetic point insertion scheduled by a move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeferredInsertion {
    /// Host clock value at which the insertion fires.
    pub due: Duration,
    /// Live point at scheduling time.
    pub point: Point2D,
}

/// Points of the annotation being drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct PointBuffer {
    points: Vec<Point2D>,
    last: Point2D,
    pending: Option<DeferredInsertion>,
}

impl PointBuffer {
    fn start(point: Point2D) -> Self {
        Self {
            points: vec![point],
            last: point,
            pending: None,
        }
    }

    pub fn points(&self) -> &[Point2D] {
        &self.points
    }

    pub fn last(&self) -> Point2D {
        self.last
    }

    pub fn pending(&self) -> Option<&DeferredInsertion> {
        self.pending.as_ref()
    }

    /// Replaces the live point (keeping the first one) and appends `point`.
    ///
    /// Returns false when `point` equals the last recorded point.
    fn track(&mut self, point: Point2D) -> bool {
        if point == self.last {
            return false;
        }
        self.last = point;
        if self.points.len() != 1 {
            self.points.pop();
        }
        self.points.push(point);
        true
    }
}

/// Gesture state of the tool.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Collecting(PointBuffer),
}

impl<H: DrawHost> DrawTool<H> {
    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn is_collecting(&self) -> bool {
        matches!(self.gesture, Gesture::Collecting(_))
    }

    /// Buffered points of the gesture in progress.
    pub fn buffered_points(&self) -> Option<&[Point2D]> {
        match &self.gesture {
            Gesture::Collecting(buffer) => Some(buffer.points()),
            Gesture::Idle => None,
        }
    }

    pub fn has_pending_insertion(&self) -> bool {
        matches!(&self.gesture, Gesture::Collecting(b) if b.pending.is_some())
    }

    /// Current preview group, if a gesture is rendering one.
    pub fn preview(&self) -> Option<NodeId> {
        self.preview
    }

    /// Selects the annotation under the pointer, or starts collecting points.
    pub fn pointer_down(&mut self, event: &PointerEvent) -> Result<()> {
        let stage = self.host.draw_stage();
        let real = self.real_position(event.screen);
        let hit = stage.borrow().intersection(real);

        match hit {
            Some(node) => {
                let selected = {
                    let scene = stage.borrow();
                    match scene.parent(node)? {
                        Some(group) => scene.child_by_role(group, NodeRole::Shape)?,
                        None => None,
                    }
                };
                // a click on another shape rebinds the editor
                if let Some(shape) = selected {
                    if self.editor.shape() != Some(shape) {
                        let mut scene = stage.borrow_mut();
                        self.editor.disable(&mut scene)?;
                        self.editor.set_shape(Some(shape));
                        self.editor.set_image(self.host.image());
                        self.editor.enable(&mut scene)?;
                        tracing::debug!("Editing shape {}", shape);
                    }
                }
            }
            None => {
                self.unbind_editor()?;
                self.gesture = Gesture::Collecting(PointBuffer::start(event.image));
                tracing::debug!("Collecting points from {}", event.image);
            }
        }
        Ok(())
    }

    /// Tracks the live point and redraws the preview.
    pub fn pointer_move(&mut self, event: &PointerEvent) -> Result<()> {
        if !self.is_collecting() {
            return Ok(());
        }
        // an elapsed insertion is not superseded by this move
        self.run_pending_tasks();

        let factory = self.registry.get(&self.shape_name)?;
        let required = factory.required_points();
        let timeout = factory.anchor_timeout();
        let now = self.host.now();

        let points = match &mut self.gesture {
            Gesture::Idle => return Ok(()),
            Gesture::Collecting(buffer) => {
                if !buffer.track(event.image) {
                    return Ok(());
                }
                buffer.pending = None;
                if buffer.points.len() < required {
                    buffer.pending = Some(DeferredInsertion {
                        due: now + timeout,
                        point: buffer.last,
                    });
                }
                buffer.points.clone()
            }
        };

        self.render_preview(&points)
    }

    fn render_preview(&mut self, points: &[Point2D]) -> Result<()> {
        let stage = self.host.draw_stage();
        let layer = self.layer();
        let factory = self.registry.get(&self.shape_name)?;
        let annotation = factory.create(points, &self.style, self.host.image().as_ref());
        let display_name = factory.display_name().to_string();

        let group = {
            let mut scene = stage.borrow_mut();
            if let Some(previous) = self.preview.take() {
                if scene.contains(previous) {
                    scene.destroy(previous)?;
                }
            }
            let group = scene.instantiate(&annotation.into_spec(&self.shape_name));
            if let Some(shape) = scene.child_by_role(group, NodeRole::Shape)? {
                scene.set_listening(shape, false)?;
            }
            scene.set_hit_graph_enabled(layer, false)?;
            group
        };
        DrawCommand::transient(group, layer, display_name).execute(&stage)?;
        self.preview = Some(group);
        Ok(())
    }

    /// Finalizes the gesture into an annotation.
    ///
    /// Returns the new annotation group, or `None` when nothing was committed.
    /// The tool is back to idle whatever the outcome.
    pub fn pointer_up(&mut self, _event: &PointerEvent) -> Result<Option<NodeId>> {
        // a dwell that elapsed before the release still counts
        self.run_pending_tasks();
        let buffer = match mem::take(&mut self.gesture) {
            Gesture::Collecting(buffer) if buffer.points.len() > 1 => buffer,
            _ => return Ok(None),
        };
        self.commit(&buffer.points).map(Some)
    }

    /// Same as [`DrawTool::pointer_up`].
    pub fn pointer_out(&mut self, event: &PointerEvent) -> Result<Option<NodeId>> {
        self.pointer_up(event)
    }

    fn commit(&mut self, points: &[Point2D]) -> Result<NodeId> {
        let stage = self.host.draw_stage();
        let layer = self.layer();
        let scope_id = self.current_scope_id();
        let factory = self.registry.get(&self.shape_name)?;
        let annotation = factory.create(points, &self.style, self.host.image().as_ref());
        let display_name = factory.display_name().to_string();

        let (group, scope, shape) = {
            let mut scene = stage.borrow_mut();
            if let Some(preview) = self.preview.take() {
                if scene.contains(preview) {
                    scene.destroy(preview)?;
                }
            }
            let (scope, _) = resolve_or_create_scope(&mut scene, layer, &scope_id)?;
            let group = scene.instantiate(&annotation.into_spec(&self.shape_name));
            scene.set_tag(group, Uuid::new_v4().to_string())?;
            scene.set_hit_graph_enabled(layer, true)?;
            let shape = scene.child_by_role(group, NodeRole::Shape)?;
            (group, scope, shape)
        };

        let mut cmd = DrawCommand::draw(group, scope, layer, display_name).with_hooks(self.hooks());
        cmd.execute(&stage)?;
        tracing::debug!("{} committed at {} with {} points", cmd.name(), scope_id, points.len());
        self.host.push_undo(cmd);

        if let Some(shape) = shape {
            self.set_shape_on(shape)?;
        }
        Ok(group)
    }

    pub fn touch_start(&mut self, event: &PointerEvent) -> Result<()> {
        self.pointer_down(event)
    }

    pub fn touch_move(&mut self, event: &PointerEvent) -> Result<()> {
        self.pointer_move(event)
    }

    pub fn touch_end(&mut self, event: &PointerEvent) -> Result<Option<NodeId>> {
        self.pointer_up(event)
    }

    pub fn key_down(&mut self, event: &KeyEvent) {
        self.host.on_keydown(event);
    }

    /// Fires the pending insertion if it is due. Returns true if a point was added.
    pub fn run_pending_tasks(&mut self) -> bool {
        let now = self.host.now();
        let Gesture::Collecting(buffer) = &mut self.gesture else {
            return false;
        };
        match buffer.pending {
            Some(task) if now >= task.due => {
                buffer.pending = None;
                buffer.points.push(task.point);
                tracing::debug!("Anchor inserted at {}", task.point);
                true
            }
            _ => false,
        }
    }

    /// Drops the gesture in progress and its preview.
    pub(crate) fn cancel_gesture(&mut self) -> Result<()> {
        self.gesture = Gesture::Idle;
        if let Some(preview) = self.preview.take() {
            let stage = self.host.draw_stage();
            let mut scene = stage.borrow_mut();
            if scene.contains(preview) {
                scene.destroy(preview)?;
            }
        }
        Ok(())
    }
}
