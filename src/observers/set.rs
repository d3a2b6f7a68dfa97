//! # ObserverSet: synchronous fan-out over multiple observers
//!
//! [`ObserverSet`] hands each [`Event`] to every observer in registration order.
//!
//! ## What it guarantees
//! - Per-observer order equals emission order.
//! - Panics inside observers are caught and logged (isolation); the remaining observers
//!   receive the event and then an [`EventKind::ObserverPanicked`](crate::EventKind::ObserverPanicked)
//!   report.
//!
//! ## Diagram
//! ```text
//!    emit(&Event)
//!        ├──► O1.on_event()
//!        ├──► O2.on_event()   (panic caught ─► warn! + ObserverPanicked to the others)
//!        └──► ON.on_event()
//! ```

use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use tracing::warn;

use crate::events::Event;

use super::Observe;

#[derive(Clone, Default)]
pub struct ObserverSet {
    observers: Vec<Rc<dyn Observe>>,
}

impl ObserverSet {
    #[must_use]
    pub fn new(observers: Vec<Rc<dyn Observe>>) -> Self {
        Self { observers }
    }

    pub fn push(&mut self, observer: Rc<dyn Observe>) {
        self.observers.push(observer);
    }

    /// Fan-out one event to all observers.
    pub fn emit(&self, event: &Event) {
        let mut panicked = Vec::new();
        for (i, obs) in self.observers.iter().enumerate() {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| obs.on_event(event))) {
                let info = panic_message(payload.as_ref());
                warn!(observer = obs.name(), info = %info, "observer panicked");
                panicked.push((i, Event::observer_panicked(obs.name(), info)));
            }
        }

        for (culprit, report) in panicked {
            for (i, obs) in self.observers.iter().enumerate() {
                if i == culprit {
                    continue;
                }
                let _ = panic::catch_unwind(AssertUnwindSafe(|| obs.on_event(&report)));
            }
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.len()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
