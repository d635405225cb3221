//! Application-level types for the root crate
use serde::Serialize;
use slicemark_core::{DrawEvent, Point2D};
use std::fmt;

/// One annotation left on the stage at the end of a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotationSummary {
    pub id: String,
    pub kind: String,
    pub scope: String,
    pub label: String,
    /// Shape points in stage coordinates.
    pub points: Vec<Point2D>,
}

/// A scripted step the tool rejected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepFailure {
    pub step: usize,
    pub message: String,
}

/// Outcome of replaying a script.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReplayReport {
    pub events: Vec<DrawEvent>,
    pub annotations: Vec<AnnotationSummary>,
    pub failures: Vec<StepFailure>,
    pub undo_depth: usize,
}

impl ReplayReport {
    pub fn annotations_in(&self, scope: &str) -> impl Iterator<Item = &AnnotationSummary> {
        let scope = scope.to_string();
        self.annotations.iter().filter(move |a| a.scope == scope)
    }
}

impl fmt::Display for ReplayReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Events ({}):", self.events.len())?;
        for event in &self.events {
            writeln!(f, "  {}", event.description())?;
        }
        writeln!(f, "Annotations ({}):", self.annotations.len())?;
        for a in &self.annotations {
            let points: Vec<String> = a.points.iter().map(|p| p.to_string()).collect();
            writeln!(
                f,
                "  [{}] {} {} '{}' {}",
                a.scope,
                a.kind,
                a.id,
                a.label,
                points.join(" ")
            )?;
        }
        for failure in &self.failures {
            writeln!(f, "Step {} failed: {}", failure.step, failure.message)?;
        }
        write!(f, "Undo depth: {}", self.undo_depth)
    }
}
