//! Event dispatcher implementation.
//!
//! A per-tool registry of listeners keyed by event kind. Dispatch is
//! synchronous and happens on the calling (UI) thread.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use uuid::Uuid;

use super::events::{DrawEvent, DrawEventKind};
use crate::types::Listener;

/// Handle identifying one listener registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(Uuid);

impl ListenerId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Listener({})", &self.0.to_string()[..8])
    }
}

/// Synchronous listener registry for draw lifecycle events
///
/// Listeners for one kind are kept in registration order and the same closure
/// may be registered more than once. Each registration gets its own
/// [`ListenerId`].
#[derive(Default)]
pub struct EventDispatcher {
    listeners: RefCell<HashMap<DrawEventKind, Vec<(ListenerId, Listener)>>>,
}

impl EventDispatcher {
    /// Create an empty dispatcher
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for one event kind
    pub fn add_listener<F>(&self, kind: DrawEventKind, listener: F) -> ListenerId
    where
        F: Fn(&DrawEvent) + 'static,
    {
        self.add_shared_listener(kind, Rc::new(listener))
    }

    /// Register an already shared listener
    pub fn add_shared_listener(&self, kind: DrawEventKind, listener: Listener) -> ListenerId {
        let id = ListenerId::new();
        self.listeners
            .borrow_mut()
            .entry(kind)
            .or_default()
            .push((id, listener));
        tracing::debug!("{} added for {}", id, kind);
        id
    }

    /// Remove a listener registration
    ///
    /// Returns true if the registration was found and removed.
    pub fn remove_listener(&self, kind: DrawEventKind, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let Some(entries) = listeners.get_mut(&kind) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        let removed = entries.len() != before;
        if removed {
            tracing::debug!("{} removed from {}", id, kind);
        }
        removed
    }

    /// Invoke every listener registered for the event's kind
    ///
    /// The listener list is snapshotted first: listeners may add or remove
    /// registrations while being called, and those changes apply from the
    /// next dispatch on.
    pub fn fire(&self, event: &DrawEvent) {
        let snapshot: Vec<Listener> = match self.listeners.borrow().get(&event.kind) {
            Some(entries) => entries.iter().map(|(_, l)| Rc::clone(l)).collect(),
            None => return,
        };
        for listener in snapshot {
            listener(event);
        }
    }

    /// Number of listeners registered for one kind
    pub fn listener_count(&self, kind: DrawEventKind) -> usize {
        self.listeners.borrow().get(&kind).map_or(0, Vec::len)
    }

    /// Total number of registrations
    pub fn subscriber_count(&self) -> usize {
        self.listeners.borrow().values().map(Vec::len).sum()
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
