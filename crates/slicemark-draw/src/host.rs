//! Host viewer contract and input event types.

use serde::{Deserialize, Serialize};
use slicemark_core::{ImageGeometry, Point2D, Shared, SlicePosition};
use std::fmt;
use std::time::Duration;

use crate::commands::DrawCommand;
use crate::scene::{NodeId, Scene};
use crate::viewport::Viewport;

/// Position notifications the tool subscribes to while displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HostEventKind {
    #[serde(rename = "slice-change")]
    SliceChange,
    #[serde(rename = "frame-change")]
    FrameChange,
}

impl HostEventKind {
    pub const ALL: [HostEventKind; 2] = [HostEventKind::SliceChange, HostEventKind::FrameChange];

    pub fn as_str(&self) -> &'static str {
        match self {
            HostEventKind::SliceChange => "slice-change",
            HostEventKind::FrameChange => "frame-change",
        }
    }
}

impl fmt::Display for HostEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cursor shown over the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CursorStyle {
    #[default]
    Default,
    Pointer,
}

/// Pointer or touch event.
///
/// `screen` is the stage (screen) coordinate used for hit-testing, `image` the
/// coordinate in image space used for point collection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub screen: Point2D,
    pub image: Point2D,
}

impl PointerEvent {
    /// Event where screen and image coordinates coincide.
    pub fn at(x: f64, y: f64) -> Self {
        let p = Point2D::new(x, y);
        Self { screen: p, image: p }
    }

    /// Event at a screen location, with the image coordinate derived from the view.
    pub fn from_screen(screen: Point2D, viewport: &Viewport) -> Self {
        Self {
            screen,
            image: viewport.to_real(screen),
        }
    }
}

/// Event emitted by the host's drag engine while a shape is dragged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragEvent {
    /// New position of the dragged node.
    pub position: Point2D,
    /// Pointer offset on the canvas, in screen units.
    pub offset: Point2D,
}

impl DragEvent {
    pub fn new(position: Point2D, offset: Point2D) -> Self {
        Self { position, offset }
    }
}

/// Keyboard event forwarded to the host untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: String,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub shift: bool,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ctrl: false,
            shift: false,
        }
    }
}

/// The viewer application hosting the draw tool.
pub trait DrawHost {
    /// Stage holding the draw layers.
    fn draw_stage(&self) -> Shared<Scene>;

    /// Draw layer of the current view.
    fn current_draw_layer(&self) -> NodeId;

    fn image(&self) -> Option<ImageGeometry>;

    fn current_position(&self) -> SlicePosition;

    fn current_frame(&self) -> usize;

    fn set_current_position(&mut self, position: SlicePosition);

    /// Stores an executed command on the host undo stack.
    fn push_undo(&mut self, command: DrawCommand);

    /// Starts forwarding `kind` notifications to the tool's `update_draw_layer`.
    fn add_host_listener(&mut self, kind: HostEventKind);

    fn remove_host_listener(&mut self, kind: HostEventKind);

    /// Routes canvas input to the tool (or stops doing so).
    fn set_canvas_listening(&mut self, listening: bool);

    fn viewport(&self) -> Viewport;

    fn window_scale(&self) -> f64;

    fn slice_count(&self) -> usize;

    fn on_keydown(&mut self, event: &KeyEvent);

    /// Monotonic clock used to schedule deferred tasks.
    fn now(&self) -> Duration;

    fn set_cursor(&mut self, cursor: CursorStyle);

    /// Asks the user for a label; `None` on cancel.
    fn prompt_label(&mut self, title: &str, current: &str) -> Option<String>;
}
