//! Type aliases for commonly used complex types.
//!
//! The draw tool is single-threaded and driven by UI callbacks, so shared
//! state is `Rc<RefCell<T>>` and callbacks are `Rc<dyn Fn>` rather than the
//! `Send + Sync` variants.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use slicemark_core::types::*;
//!
//! // Instead of: Rc<RefCell<Scene>>
//! let stage: Shared<Scene> = shared(Scene::new());
//! stage.borrow_mut().add_layer();
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use crate::event_bus::DrawEvent;

/// A reference-counted, interior-mutable wrapper for single-threaded sharing.
///
/// Use when the host and the draw tool both need mutable access to the same
/// state (e.g. the draw stage).
pub type Shared<T> = Rc<RefCell<T>>;

/// Wraps a value into a [`Shared`] handle.
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

/// A listener registered on the event dispatcher.
pub type Listener = Rc<dyn Fn(&DrawEvent)>;

/// A post-execute / post-undo hook carried by commands.
///
/// Hosts wire hooks to the event dispatcher to learn about lifecycle changes.
pub type EventHook = Rc<dyn Fn(&DrawEvent)>;
