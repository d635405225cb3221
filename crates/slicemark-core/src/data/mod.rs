//! Data primitives shared across the workspace.
//!
//! - [`Point2D`]: an immutable point in image/display coordinates
//! - [`SlicePosition`]: the (i, j, k) index position inside a volume
//! - [`ImageGeometry`]: the image context handed to shape factories

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg, Sub};

/// Immutable 2D point in image/display coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    x: f64,
    y: f64,
}

impl Point2D {
    /// Creates a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The origin point (0, 0).
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    /// X coordinate.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Y coordinate.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point2D) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// True if both coordinates are exactly zero.
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Checks whether `other` lies strictly inside the axis-aligned square of
    /// half side `half_size` centred on this point.
    pub fn within_square(&self, other: &Point2D, half_size: f64) -> bool {
        (self.x - other.x).abs() < half_size && (self.y - other.y).abs() < half_size
    }
}

impl Add for Point2D {
    type Output = Point2D;

    fn add(self, rhs: Point2D) -> Point2D {
        Point2D::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2D {
    type Output = Point2D;

    fn sub(self, rhs: Point2D) -> Point2D {
        Point2D::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Point2D {
    type Output = Point2D;

    fn neg(self) -> Point2D {
        Point2D::new(-self.x, -self.y)
    }
}

impl fmt::Display for Point2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

/// Index position inside the displayed volume.
///
/// `k` is the slice index; `i` and `j` are the in-plane indices carried along
/// when the host changes slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SlicePosition {
    pub i: usize,
    pub j: usize,
    pub k: usize,
}

impl SlicePosition {
    /// Creates a new position.
    pub fn new(i: usize, j: usize, k: usize) -> Self {
        Self { i, j, k }
    }

    /// Same in-plane position on another slice.
    pub fn with_slice(&self, k: usize) -> Self {
        Self { k, ..*self }
    }
}

impl fmt::Display for SlicePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.i, self.j, self.k)
    }
}

/// Image context used by shape factories for quantification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageGeometry {
    /// Number of columns (pixels along x).
    pub columns: usize,
    /// Number of rows (pixels along y).
    pub rows: usize,
    /// Physical size of a pixel along x, in millimetres.
    pub spacing_x: f64,
    /// Physical size of a pixel along y, in millimetres.
    pub spacing_y: f64,
}

impl ImageGeometry {
    /// Creates an image geometry with unit spacing.
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            spacing_x: 1.0,
            spacing_y: 1.0,
        }
    }

    /// Sets the pixel spacing.
    pub fn with_spacing(mut self, spacing_x: f64, spacing_y: f64) -> Self {
        self.spacing_x = spacing_x;
        self.spacing_y = spacing_y;
        self
    }

    /// Physical length of the segment between two image points.
    pub fn physical_length(&self, a: &Point2D, b: &Point2D) -> f64 {
        let dx = (b.x() - a.x()) * self.spacing_x;
        let dy = (b.y() - a.y()) * self.spacing_y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Physical area of an axis-aligned box of the given image size.
    pub fn physical_area(&self, width: f64, height: f64) -> f64 {
        (width * self.spacing_x * height * self.spacing_y).abs()
    }
}
