//! # Stateful observer that records every event.
//!
//! [`EventCollector`] keeps the events it receives in memory. Clones share the same buffer, so
//! one clone can be handed to the router while another is kept for inspection.
//!
//! ```text
//!  Router ── emit(Event) ──► ObserverSet ──► EventCollector (Rc<RefCell<Vec<Event>>>)
//!                                                   │
//!                                   kinds() / count(kind) / last(kind)
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use crate::events::{Event, EventKind};

use super::Observe;

#[derive(Clone, Default)]
pub struct EventCollector {
    events: Rc<RefCell<Vec<Event>>>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything received so far.
    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub fn kinds(&self) -> Vec<EventKind> {
        self.events.borrow().iter().map(|e| e.kind).collect()
    }

    /// Number of events of `kind`.
    pub fn count(&self, kind: EventKind) -> usize {
        self.events.borrow().iter().filter(|e| e.kind == kind).count()
    }

    /// Most recent event of `kind`.
    pub fn last(&self, kind: EventKind) -> Option<Event> {
        self.events
            .borrow()
            .iter()
            .rev()
            .find(|e| e.kind == kind)
            .cloned()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl Observe for EventCollector {
    fn on_event(&self, event: &Event) {
        self.events.borrow_mut().push(event.clone());
    }

    fn name(&self) -> &'static str {
        "EventCollector"
    }
}
