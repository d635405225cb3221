//! Draw lifecycle event definitions.
//!
//! Events are cloneable and serializable so hosts can log or replay them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Lifecycle event type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrawEventKind {
    /// An annotation was attached to the scene
    #[serde(rename = "draw-create")]
    Create,
    /// An annotation was translated
    #[serde(rename = "draw-move")]
    Move,
    /// An annotation's label or geometry changed in place
    #[serde(rename = "draw-change")]
    Change,
    /// An annotation was detached from the scene
    #[serde(rename = "draw-delete")]
    Delete,
}

impl DrawEventKind {
    /// All event kinds, in declaration order.
    pub const ALL: [DrawEventKind; 4] = [
        DrawEventKind::Create,
        DrawEventKind::Move,
        DrawEventKind::Change,
        DrawEventKind::Delete,
    ];

    /// Wire name of the event type.
    pub fn as_str(&self) -> &'static str {
        match self {
            DrawEventKind::Create => "draw-create",
            DrawEventKind::Move => "draw-move",
            DrawEventKind::Change => "draw-change",
            DrawEventKind::Delete => "draw-delete",
        }
    }
}

impl fmt::Display for DrawEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DrawEventKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DrawEventKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s || kind.as_str().trim_start_matches("draw-") == s)
            .ok_or_else(|| Error::other(format!("Unknown draw event type: {}", s)))
    }
}

/// A draw lifecycle event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawEvent {
    /// Event type.
    pub kind: DrawEventKind,
    /// Identifier of the affected annotation group, if any.
    pub id: Option<String>,
    /// Display name of the command or shape kind behind the event.
    pub shape_name: Option<String>,
    /// When the event was created.
    pub timestamp: DateTime<Utc>,
}

impl DrawEvent {
    /// Creates an event without payload.
    pub fn new(kind: DrawEventKind) -> Self {
        Self {
            kind,
            id: None,
            shape_name: None,
            timestamp: Utc::now(),
        }
    }

    /// Creates an event about one annotation group.
    pub fn for_group(kind: DrawEventKind, id: impl Into<String>, shape_name: impl Into<String>) -> Self {
        Self {
            kind,
            id: Some(id.into()),
            shape_name: Some(shape_name.into()),
            timestamp: Utc::now(),
        }
    }

    /// Short description for logging.
    pub fn description(&self) -> String {
        match (&self.shape_name, &self.id) {
            (Some(name), Some(id)) => format!("{} {} ({})", self.kind, name, id),
            (None, Some(id)) => format!("{} ({})", self.kind, id),
            _ => self.kind.to_string(),
        }
    }
}
