//! # Event Bus Module
//!
//! Synchronous publish/subscribe for draw lifecycle events.
//!
//! ## Overview
//!
//! - The draw tool fires [`DrawEvent`]s after commands execute or undo
//! - Hosts register listeners per [`DrawEventKind`]
//! - Dispatch is synchronous, in registration order, with no queuing
//!
//! ## Usage
//!
//! ```rust,ignore
//! use slicemark_core::event_bus::{DrawEvent, DrawEventKind, EventDispatcher};
//!
//! let dispatcher = EventDispatcher::new();
//! let id = dispatcher.add_listener(DrawEventKind::Create, |event| {
//!     println!("created {:?}", event.id);
//! });
//!
//! dispatcher.fire(&DrawEvent::new(DrawEventKind::Create));
//! dispatcher.remove_listener(DrawEventKind::Create, id);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
