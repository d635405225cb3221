//! # Slicemark Core
//!
//! Core types, errors and lifecycle events for Slicemark.
//! Provides the point and position primitives, the draw lifecycle events
//! and the synchronous event dispatcher shared by the draw tool and its host.

pub mod data;
pub mod error;
pub mod event_bus;
pub mod types;

pub use data::{ImageGeometry, Point2D, SlicePosition};

pub use error::{DrawError, Error, Result};

pub use event_bus::{DrawEvent, DrawEventKind, EventDispatcher, ListenerId};

pub use types::{shared, EventHook, Listener, Shared};
