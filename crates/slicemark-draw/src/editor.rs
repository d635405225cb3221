//! Anchor editor contract.
//!
//! The anchor editor resizes a selected shape through draggable anchors. Its
//! internals live with the host; the draw tool only binds shapes to it and
//! toggles it around gestures.

use slicemark_core::{EventHook, ImageGeometry, Point2D, Result};

use crate::scene::{NodeId, Scene};

/// Editor bound to at most one shape at a time.
pub trait ShapeEditor {
    /// Shape currently bound, if any.
    fn shape(&self) -> Option<NodeId>;

    /// Binds (or with `None` unbinds) a shape. Call [`ShapeEditor::disable`] first.
    fn set_shape(&mut self, shape: Option<NodeId>);

    fn set_image(&mut self, image: Option<ImageGeometry>);

    /// Shows the anchors of the bound shape.
    fn enable(&mut self, scene: &mut Scene) -> Result<()>;

    /// Hides the anchors.
    fn disable(&mut self, scene: &mut Scene) -> Result<()>;

    fn is_enabled(&self) -> bool;

    /// Lets anchors react to pointer events (or not).
    fn set_anchors_active(&mut self, active: bool);

    /// Re-places the anchors on the bound shape's current geometry.
    fn reset_anchors(&mut self, scene: &Scene) -> Result<()>;

    /// Callback the editor uses to report its own lifecycle events.
    fn set_draw_event_callback(&mut self, callback: EventHook);
}

/// Editor that only tracks its binding and anchor positions.
///
/// Useful for headless hosts and tests.
#[derive(Default)]
pub struct TrackingEditor {
    shape: Option<NodeId>,
    image: Option<ImageGeometry>,
    enabled: bool,
    anchors_active: bool,
    anchors: Vec<Point2D>,
}

impl TrackingEditor {
    pub fn new() -> Self {
        Self {
            anchors_active: true,
            ..Self::default()
        }
    }

    pub fn image(&self) -> Option<&ImageGeometry> {
        self.image.as_ref()
    }

    pub fn anchors_active(&self) -> bool {
        self.anchors_active
    }

    /// Anchor positions in real coordinates.
    pub fn anchors(&self) -> &[Point2D] {
        &self.anchors
    }
}

impl ShapeEditor for TrackingEditor {
    fn shape(&self) -> Option<NodeId> {
        self.shape
    }

    fn set_shape(&mut self, shape: Option<NodeId>) {
        self.shape = shape;
        if shape.is_none() {
            self.anchors.clear();
        }
    }

    fn set_image(&mut self, image: Option<ImageGeometry>) {
        self.image = image;
    }

    fn enable(&mut self, scene: &mut Scene) -> Result<()> {
        if self.shape.is_none() {
            return Ok(());
        }
        self.enabled = true;
        self.reset_anchors(scene)
    }

    fn disable(&mut self, _scene: &mut Scene) -> Result<()> {
        self.enabled = false;
        self.anchors.clear();
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_anchors_active(&mut self, active: bool) {
        self.anchors_active = active;
    }

    fn reset_anchors(&mut self, scene: &Scene) -> Result<()> {
        self.anchors = match (self.enabled, self.shape) {
            (true, Some(shape)) if scene.contains(shape) => scene.absolute_points(shape)?,
            _ => Vec::new(),
        };
        Ok(())
    }

    /// Anchors are never dragged here, so there is nothing to report.
    fn set_draw_event_callback(&mut self, _callback: EventHook) {}
}
