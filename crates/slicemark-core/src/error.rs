//! Error handling for Slicemark
//!
//! Provides the error types raised by the draw tool to its host:
//! - Draw errors (configuration, selection, targets and structural invariants)
//! - A unified [`Error`] wrapping draw, I/O and serialization failures
//!
//! All error types use `thiserror` for ergonomic error handling. Every
//! condition is a synchronous, fail-fast signal to the immediate caller.

use thiserror::Error;

/// Draw tool error type
///
/// Represents the failures the draw tool reports to the host UI layer.
/// Structural variants (`LabelInvariant`, `LayoutInvariant`) indicate a defect
/// in how the scene was built and are not user-recoverable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DrawError {
    /// Requested shape kind is not registered
    #[error("Unknown shape: '{name}'")]
    UnknownShape {
        /// The requested shape kind name.
        name: String,
    },

    /// The shape registry holds no factory
    #[error("No shape factory registered")]
    EmptyRegistry,

    /// Operation needs a selected annotation and none was given
    #[error("No shape selected")]
    NoSelection,

    /// Clone target layer cannot be used
    #[error("Invalid target layer: {reason}")]
    InvalidTarget {
        /// Why the target was rejected.
        reason: String,
    },

    /// An annotation group does not hold exactly one label node
    #[error("Could not find the shape label: group {group} has {found} label nodes")]
    LabelInvariant {
        /// The annotation group identifier.
        group: String,
        /// Number of label nodes found.
        found: usize,
    },

    /// Several position groups share one scope identifier
    #[error("Layout invariant violated: {found} position groups with id '{scope}'")]
    LayoutInvariant {
        /// The position scope identifier.
        scope: String,
        /// Number of position groups found.
        found: usize,
    },

    /// A scene node handle does not resolve
    #[error("Unknown scene node: {node}")]
    UnknownNode {
        /// The unresolved node handle.
        node: String,
    },

    /// The node does not carry the interactive shape behaviour
    #[error("Node {node} is not an interactive shape")]
    NotInteractive {
        /// The offending node handle.
        node: String,
    },
}

impl DrawError {
    /// Check if this error signals a structural defect rather than bad input
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            DrawError::LabelInvariant { .. } | DrawError::LayoutInvariant { .. }
        )
    }
}

/// Main error type for Slicemark
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Draw tool error
    #[error(transparent)]
    Draw(#[from] DrawError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a draw error
    pub fn is_draw_error(&self) -> bool {
        matches!(self, Error::Draw(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
