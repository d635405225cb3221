//! Type aliases used across the workspace.

pub mod aliases;

pub use aliases::*;
