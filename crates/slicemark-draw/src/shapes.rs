//! Reference shape factories.

use slicemark_core::{ImageGeometry, Point2D};
use slicemark_settings::Style;
use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::time::Duration;

use crate::factory::{Annotation, Geometry, ShapeFactory};
use crate::label::{LabelText, Quantity};

/// Half length of the end ticks drawn across a ruler.
const TICK_LENGTH: f64 = 5.0;
/// Radius of the protractor arc.
const ARC_RADIUS: f64 = 15.0;
/// Segments used to approximate the protractor arc.
const ARC_SEGMENTS: usize = 16;

fn length_quant(a: Point2D, b: Point2D, image: Option<&ImageGeometry>) -> Quantity {
    match image {
        Some(image) => Quantity::new(image.physical_length(&a, &b), "mm"),
        None => Quantity::new(a.distance(&b), "px"),
    }
}

fn label(expr: &str, quant: BTreeMap<String, Quantity>, style: &Style) -> LabelText {
    LabelText::new(expr, quant, style.scaled_font_size())
}

fn first_and_last(points: &[Point2D]) -> (Point2D, Point2D) {
    let first = points.first().copied().unwrap_or_default();
    let last = points.last().copied().unwrap_or(first);
    (first, last)
}

/// Straight ruler between two points, labelled with its length.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineFactory;

impl ShapeFactory for LineFactory {
    fn display_name(&self) -> &str {
        "Ruler"
    }

    fn create(&self, points: &[Point2D], style: &Style, image: Option<&ImageGeometry>) -> Annotation {
        let (begin, end) = first_and_last(points);
        let quant = BTreeMap::from([("length".to_string(), length_quant(begin, end, image))]);

        // ticks perpendicular to the ruler at both ends
        let direction = end - begin;
        let length = begin.distance(&end);
        let decorations = if length > 0.0 {
            let normal = Point2D::new(
                -direction.y() / length * TICK_LENGTH,
                direction.x() / length * TICK_LENGTH,
            );
            [begin, end]
                .into_iter()
                .map(|p| Geometry::open(vec![p - normal, p + normal], style))
                .collect()
        } else {
            Vec::new()
        };

        Annotation {
            shape: Geometry::open(vec![begin, end], style),
            label_position: end,
            label: label("{length}", quant, style),
            decorations,
        }
    }

    fn required_points(&self) -> usize {
        2
    }
}

/// Axis-aligned box from two corners, labelled with its surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct RectangleFactory;

impl ShapeFactory for RectangleFactory {
    fn display_name(&self) -> &str {
        "Rectangle"
    }

    fn create(&self, points: &[Point2D], style: &Style, image: Option<&ImageGeometry>) -> Annotation {
        let (begin, end) = first_and_last(points);
        let width = end.x() - begin.x();
        let height = end.y() - begin.y();
        let surface = match image {
            Some(image) => Quantity::new(image.physical_area(width, height), "mm2"),
            None => Quantity::new((width * height).abs(), "px2"),
        };
        let corners = vec![
            begin,
            Point2D::new(end.x(), begin.y()),
            end,
            Point2D::new(begin.x(), end.y()),
        ];
        Annotation {
            shape: Geometry::closed(corners, style),
            label_position: Point2D::new(begin.x(), end.y().max(begin.y())),
            label: label("{surface}", BTreeMap::from([("surface".to_string(), surface)]), style),
            decorations: Vec::new(),
        }
    }

    fn required_points(&self) -> usize {
        2
    }
}

/// Two joined segments measuring the angle at the middle point.
///
/// The third point is usually placed by dwelling, hence the anchor timeout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtractorFactory;

impl ProtractorFactory {
    /// Angle at `vertex` between the rays to `a` and `b`, in degrees within [0, 180].
    pub fn angle(a: Point2D, vertex: Point2D, b: Point2D) -> f64 {
        let start = (a.y() - vertex.y()).atan2(a.x() - vertex.x());
        let end = (b.y() - vertex.y()).atan2(b.x() - vertex.x());
        let mut angle = (end - start).abs();
        if angle > PI {
            angle = 2.0 * PI - angle;
        }
        angle.to_degrees()
    }

    fn arc(a: Point2D, vertex: Point2D, b: Point2D, style: &Style) -> Geometry {
        let start = (a.y() - vertex.y()).atan2(a.x() - vertex.x());
        let end = (b.y() - vertex.y()).atan2(b.x() - vertex.x());
        let mut sweep = end - start;
        if sweep > PI {
            sweep -= 2.0 * PI;
        } else if sweep < -PI {
            sweep += 2.0 * PI;
        }
        let points = (0..=ARC_SEGMENTS)
            .map(|i| {
                let theta = start + sweep * i as f64 / ARC_SEGMENTS as f64;
                Point2D::new(
                    vertex.x() + ARC_RADIUS * theta.cos(),
                    vertex.y() + ARC_RADIUS * theta.sin(),
                )
            })
            .collect();
        Geometry::open(points, style)
    }
}

impl ShapeFactory for ProtractorFactory {
    fn display_name(&self) -> &str {
        "Protractor"
    }

    fn create(&self, points: &[Point2D], style: &Style, _image: Option<&ImageGeometry>) -> Annotation {
        let shown: Vec<Point2D> = points.iter().take(3).copied().collect();
        let (mut quant, mut decorations) = (BTreeMap::new(), Vec::new());
        if let [a, vertex, b] = shown[..] {
            quant.insert(
                "angle".to_string(),
                Quantity::new(Self::angle(a, vertex, b), "°"),
            );
            decorations.push(Self::arc(a, vertex, b, style));
        }
        let label_position = shown.get(1).or(shown.first()).copied().unwrap_or_default();
        Annotation {
            shape: Geometry::open(shown, style),
            label_position,
            label: label("{angle}", quant, style),
            decorations,
        }
    }

    fn required_points(&self) -> usize {
        3
    }

    fn anchor_timeout(&self) -> Duration {
        Duration::from_millis(500)
    }
}

/// Free hand polyline through every collected point.
#[derive(Debug, Clone, Copy, Default)]
pub struct FreeHandFactory;

impl ShapeFactory for FreeHandFactory {
    fn display_name(&self) -> &str {
        "Free hand"
    }

    fn create(&self, points: &[Point2D], style: &Style, _image: Option<&ImageGeometry>) -> Annotation {
        let label_position = points.first().copied().unwrap_or_default();
        Annotation {
            shape: Geometry::open(points.to_vec(), style),
            label_position,
            label: label("", BTreeMap::new(), style),
            decorations: Vec::new(),
        }
    }

    fn required_points(&self) -> usize {
        1000
    }
}
