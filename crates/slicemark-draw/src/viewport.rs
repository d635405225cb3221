//! Viewport and coordinate transformation for the draw stage.
//!
//! Handles conversion between screen coordinates (pointer space) and real
//! coordinates (image space). The host owns the view state; the tool reads a
//! [`Viewport`] snapshot whenever it needs to map a pointer position.

use std::fmt;

use slicemark_core::Point2D;

/// Represents the viewport transformation state (scale and offset).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    scale_x: f64,
    scale_y: f64,
    offset: Point2D,
    canvas_width: f64,
    canvas_height: f64,
}

impl Viewport {
    /// Creates an identity viewport with the given canvas dimensions.
    pub fn new(canvas_width: f64, canvas_height: f64) -> Self {
        Self {
            scale_x: 1.0,
            scale_y: 1.0,
            offset: Point2D::zero(),
            canvas_width,
            canvas_height,
        }
    }

    pub fn with_scale(mut self, scale_x: f64, scale_y: f64) -> Self {
        self.set_scale(scale_x, scale_y);
        self
    }

    pub fn with_offset(mut self, offset: Point2D) -> Self {
        self.offset = offset;
        self
    }

    pub fn canvas_width(&self) -> f64 {
        self.canvas_width
    }

    pub fn canvas_height(&self) -> f64 {
        self.canvas_height
    }

    /// Gets the scale as a point (x, y).
    pub fn scale(&self) -> Point2D {
        Point2D::new(self.scale_x, self.scale_y)
    }

    /// Sets the scale, ignoring non-positive components.
    pub fn set_scale(&mut self, scale_x: f64, scale_y: f64) {
        if scale_x > 0.0 && scale_y > 0.0 {
            self.scale_x = scale_x;
            self.scale_y = scale_y;
        }
    }

    /// Multiplies the scale by `factor`.
    pub fn zoom_by(&mut self, factor: f64) {
        self.set_scale(self.scale_x * factor, self.scale_y * factor);
    }

    /// Real coordinate shown at the top-left screen corner.
    pub fn offset(&self) -> Point2D {
        self.offset
    }

    pub fn set_offset(&mut self, offset: Point2D) {
        self.offset = offset;
    }

    /// Converts screen coordinates to real coordinates.
    ///
    /// ```text
    /// real = offset + screen / scale
    /// ```
    pub fn to_real(&self, screen: Point2D) -> Point2D {
        Point2D::new(
            self.offset.x() + screen.x() / self.scale_x,
            self.offset.y() + screen.y() / self.scale_y,
        )
    }

    /// Converts real coordinates to screen coordinates.
    pub fn to_screen(&self, real: Point2D) -> Point2D {
        Point2D::new(
            (real.x() - self.offset.x()) * self.scale_x,
            (real.y() - self.offset.y()) * self.scale_y,
        )
    }

    /// Real coordinate of a fixed screen location, e.g. an overlay anchored to the canvas.
    pub fn screen_anchor(&self, screen_x: f64, screen_y: f64) -> Point2D {
        self.to_real(Point2D::new(screen_x, screen_y))
    }

    /// Scale that cancels the view scale, so overlays keep a constant screen size.
    pub fn inverse_scale(&self) -> Point2D {
        Point2D::new(1.0 / self.scale_x, 1.0 / self.scale_y)
    }

    /// Resets viewport to identity scale and zero offset.
    pub fn reset(&mut self) {
        self.scale_x = 1.0;
        self.scale_y = 1.0;
        self.offset = Point2D::zero();
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Scale: ({:.2}, {:.2}) | Offset: ({:.1}, {:.1})",
            self.scale_x,
            self.scale_y,
            self.offset.x(),
            self.offset.y()
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(512.0, 512.0)
    }
}
