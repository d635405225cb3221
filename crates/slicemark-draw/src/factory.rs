//! Shape factory contract and registry.
//!
//! A factory turns the collected points into an [`Annotation`]: one geometry,
//! one label and any number of decorations. The draw tool never looks inside
//! the geometry; it only relies on that single-shape/single-label layout.

use slicemark_core::{DrawError, ImageGeometry, Point2D, Result};
use slicemark_settings::Style;
use std::time::Duration;

use crate::label::LabelText;
use crate::scene::{NodeRole, NodeSpec};
use crate::shapes::{FreeHandFactory, LineFactory, ProtractorFactory, RectangleFactory};

/// Suffix of annotation group names, e.g. `line-group`.
pub const GROUP_SUFFIX: &str = "-group";

/// Path geometry produced by a factory, in real coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub points: Vec<Point2D>,
    pub closed: bool,
    pub stroke: String,
    pub stroke_width: f64,
}

impl Geometry {
    pub fn open(points: Vec<Point2D>, style: &Style) -> Self {
        Self {
            points,
            closed: false,
            stroke: style.line_colour().to_string(),
            stroke_width: style.scaled_stroke_width(),
        }
    }

    pub fn closed(points: Vec<Point2D>, style: &Style) -> Self {
        Self {
            closed: true,
            ..Self::open(points, style)
        }
    }

    fn into_spec(self, role: NodeRole) -> NodeSpec {
        let mut spec = NodeSpec::path(role, self.points, self.closed, self.stroke);
        spec.stroke_width = self.stroke_width;
        spec
    }
}

/// Output of a factory, before it is placed in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub shape: Geometry,
    pub label_position: Point2D,
    pub label: LabelText,
    pub decorations: Vec<Geometry>,
}

impl Annotation {
    /// Scene subtree for this annotation: group, shape, label, decorations.
    pub fn into_spec(self, kind: &str) -> NodeSpec {
        let mut group = NodeSpec::group(NodeRole::ShapeGroup, format!("{}{}", kind, GROUP_SUFFIX))
            .with_child(self.shape.into_spec(NodeRole::Shape))
            .with_child(NodeSpec::label(self.label, self.label_position));
        for decoration in self.decorations {
            group = group.with_child(decoration.into_spec(NodeRole::Decoration));
        }
        group
    }
}

/// Builder for one kind of annotation.
pub trait ShapeFactory {
    /// Human readable name, e.g. "Ruler".
    fn display_name(&self) -> &str;

    /// Builds an annotation from `points`. Must not depend on hidden state.
    fn create(&self, points: &[Point2D], style: &Style, image: Option<&ImageGeometry>) -> Annotation;

    /// Number of points the shape needs. Point collection stops asking for
    /// dwell insertion once this many points are buffered.
    fn required_points(&self) -> usize;

    /// Dwell time after which the live point is inserted as an extra point.
    fn anchor_timeout(&self) -> Duration {
        Duration::ZERO
    }
}

/// Registered factories, in registration order.
#[derive(Default)]
pub struct ShapeRegistry {
    factories: Vec<(String, Box<dyn ShapeFactory>)>,
}

impl ShapeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the reference factories: line, rectangle, protractor, freehand.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("line", LineFactory);
        registry.register("rectangle", RectangleFactory);
        registry.register("protractor", ProtractorFactory);
        registry.register("freehand", FreeHandFactory);
        registry
    }

    /// Adds or replaces a factory. A replaced factory keeps its position.
    pub fn register(&mut self, name: impl Into<String>, factory: impl ShapeFactory + 'static) {
        let name = name.into();
        let factory: Box<dyn ShapeFactory> = Box::new(factory);
        match self.factories.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = factory,
            None => self.factories.push((name, factory)),
        }
    }

    pub fn get(&self, name: &str) -> Result<&dyn ShapeFactory> {
        self.factories
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, f)| f.as_ref())
            .ok_or_else(|| {
                DrawError::UnknownShape {
                    name: name.to_string(),
                }
                .into()
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.iter().any(|(n, _)| n == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.factories.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// First registered kind.
    pub fn first(&self) -> Option<&str> {
        self.factories.first().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Display name for an annotation group name such as `line-group`.
    pub fn display_name_for(&self, group_name: &str) -> Option<&str> {
        let kind = group_name.strip_suffix(GROUP_SUFFIX)?;
        self.get(kind).ok().map(|f| f.display_name())
    }
}
