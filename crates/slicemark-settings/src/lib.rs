//! Slicemark Settings Crate
//!
//! Handles the draw style and the drag-to-delete settings, with JSON/TOML
//! persistence and validation.

pub mod config;
pub mod error;

pub use config::{DrawConfig, Style, TrashSettings};
pub use error::{SettingsError, SettingsResult};
