//! # Slicemark
//!
//! Annotation draw tool for slice/frame image viewers:
//! - Ruler, rectangle, protractor and free hand annotations
//! - Undoable create, move and delete commands
//! - Drag-to-delete through a trash target
//! - Annotations grouped per (slice, frame) position
//!
//! ## Architecture
//!
//! Slicemark is organized as a workspace with multiple crates:
//!
//! 1. **slicemark-core** - Points, positions, errors, lifecycle events
//! 2. **slicemark-settings** - Draw style and trash settings (JSON/TOML)
//! 3. **slicemark-draw** - Scene, shape factories, commands and the draw tool
//! 4. **slicemark** - In-memory host and the headless replay binary

pub mod host;
pub mod replay;
pub mod types;

pub use slicemark_core::{
    DrawError, DrawEvent, DrawEventKind, Error, EventDispatcher, ImageGeometry, Point2D, Result,
    SlicePosition,
};

pub use slicemark_settings::{DrawConfig, SettingsError, Style, TrashSettings};

pub use slicemark_draw::{
    DragOutcome, DrawCommand, DrawHost, DrawTool, Scene, ShapeFactory, ShapeRegistry, UndoStack,
    Viewport,
};

pub use host::MemoryHost;
pub use replay::{run_script, LayerInput, Replay, Script, Step};
pub use types::{AnnotationSummary, ReplayReport, StepFailure};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
