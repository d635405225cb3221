//! Configuration for the draw tool
//!
//! Configuration is organized into two sections:
//! - Style applied to newly created annotations (colours, font, scale)
//! - Drag-to-delete trash target (screen offset, threshold, colours)
//!
//! Files may be JSON or TOML, chosen by extension.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{SettingsError, SettingsResult};

/// Drawing style shared by the annotations the tool creates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    /// Stroke colour of new geometry
    pub line_colour: String,
    /// Fill colour of label text
    pub text_colour: String,
    /// Label font size before scaling
    pub font_size: f64,
    /// Display scale (window scale of the host)
    pub scale: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            line_colour: "#ffff80".to_string(),
            text_colour: "#ffffff".to_string(),
            font_size: 10.0,
            scale: 1.0,
        }
    }
}

impl Style {
    /// Gets the line colour.
    pub fn line_colour(&self) -> &str {
        &self.line_colour
    }

    /// Sets the line colour.
    pub fn set_line_colour(&mut self, colour: impl Into<String>) {
        self.line_colour = colour.into();
    }

    /// Sets the display scale.
    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }

    /// Font size after applying the display scale.
    pub fn scaled_font_size(&self) -> f64 {
        self.font_size * self.scale
    }

    /// Stroke width after applying the display scale.
    pub fn scaled_stroke_width(&self) -> f64 {
        2.0 * self.scale
    }
}

/// Drag-to-delete trash target settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrashSettings {
    /// Horizontal offset from the viewport origin, in screen units
    pub offset_x: f64,
    /// Vertical offset from the viewport origin, in screen units
    pub offset_y: f64,
    /// Half side of the square, in real coordinates, that counts as "on the trash"
    pub threshold: f64,
    /// Half length of each cross arm
    pub arm_length: f64,
    /// Cross colour at rest
    pub colour: String,
    /// Cross colour while a shape hovers over it
    pub highlight_colour: String,
    /// Stroke applied to the dragged shape while over the trash
    pub warning_colour: String,
}

impl Default for TrashSettings {
    fn default() -> Self {
        Self {
            offset_x: 256.0,
            offset_y: 20.0,
            threshold: 10.0,
            arm_length: 10.0,
            colour: "red".to_string(),
            highlight_colour: "orange".to_string(),
            warning_colour: "red".to_string(),
        }
    }
}

/// Complete draw tool configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DrawConfig {
    pub style: Style,
    pub trash: TrashSettings,
}

impl DrawConfig {
    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::from_str(&content)?
        } else {
            return Err(SettingsError::UnsupportedFormat(
                path.display().to_string(),
            ));
        };

        config.validate()?;
        tracing::debug!("Loaded draw config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::to_string_pretty(self)?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::to_string_pretty(self)?
        } else {
            return Err(SettingsError::UnsupportedFormat(
                path.display().to_string(),
            ));
        };

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate all settings
    pub fn validate(&self) -> SettingsResult<()> {
        if self.style.line_colour.trim().is_empty() {
            return Err(SettingsError::invalid("style.line_colour", "must not be empty"));
        }
        if !(self.style.scale > 0.0) {
            return Err(SettingsError::invalid("style.scale", "must be > 0"));
        }
        if !(self.style.font_size > 0.0) {
            return Err(SettingsError::invalid("style.font_size", "must be > 0"));
        }
        if !(self.trash.threshold > 0.0) {
            return Err(SettingsError::invalid("trash.threshold", "must be > 0"));
        }
        for (key, colour) in [
            ("trash.colour", &self.trash.colour),
            ("trash.highlight_colour", &self.trash.highlight_colour),
            ("trash.warning_colour", &self.trash.warning_colour),
        ] {
            if colour.trim().is_empty() {
                return Err(SettingsError::invalid(key, "must not be empty"));
            }
        }
        Ok(())
    }
}
