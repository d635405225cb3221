//! # Slicemark Draw
//!
//! Interactive annotation tool for slice/frame image viewers. Pointer input
//! becomes annotations on a retained draw stage; every committed mutation is
//! an undoable command handed to the host.
//!
//! ## Core Components
//!
//! - **Scene**: arena scene graph with role-based lookup and hit-testing
//! - **Layout**: position scopes grouping annotations per (slice, frame)
//! - **Factories**: pluggable shape builders (ruler, rectangle, protractor, free hand)
//! - **Commands**: create, move and delete with post-execute/post-undo hooks
//! - **Tool**: gesture state machine, live preview, drag-to-delete, label edition
//!
//! ## Architecture
//!
//! ```text
//! DrawTool
//!   ├── Gesture (Idle / Collecting + deferred anchor insertion)
//!   ├── ShapeRegistry (factories)
//!   ├── ShapeEditor (anchor editing, external)
//!   └── EventDispatcher (draw-create / draw-move / draw-change / draw-delete)
//!
//! DrawHost (viewer)
//!   ├── Scene (stage → layer → position group → shape group)
//!   └── Undo stack (DrawCommand)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use slicemark_draw::{DrawTool, PointerEvent};
//!
//! let mut tool = DrawTool::with_defaults(host);
//! tool.init()?;
//! tool.display(true)?;
//! tool.pointer_down(&PointerEvent::at(10.0, 10.0))?;
//! tool.pointer_move(&PointerEvent::at(50.0, 50.0))?;
//! let group = tool.pointer_up(&PointerEvent::at(50.0, 50.0))?;
//! ```

pub mod commands;
pub mod editor;
pub mod factory;
pub mod host;
pub mod label;
pub mod layout;
pub mod scene;
pub mod shapes;
pub mod tool;
pub mod undo;
pub mod viewport;

pub use commands::{Command, CommandHooks, DrawCommand};
pub use editor::{ShapeEditor, TrackingEditor};
pub use factory::{Annotation, Geometry, ShapeFactory, ShapeRegistry};
pub use host::{CursorStyle, DragEvent, DrawHost, HostEventKind, KeyEvent, PointerEvent};
pub use label::{replace_flags, LabelText, Quantity};
pub use layout::{position_scope_id, resolve_scope, shape_groups_at, PositionScopeId};
pub use scene::{NodeContent, NodeId, NodeRole, NodeSpec, Scene, SceneNode};
pub use shapes::{FreeHandFactory, LineFactory, ProtractorFactory, RectangleFactory};
pub use tool::{DragOutcome, DrawTool, Gesture};
pub use undo::UndoStack;
pub use viewport::Viewport;
