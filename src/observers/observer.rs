//! # Core observer trait
//!
//! `Observe` is the extension point for plugging custom event handlers into the router.
//! Every [`Event`] the router emits is handed to each observer, synchronously, in
//! registration order.
//!
//! ## Contract
//! - Observers run on the router's thread, inside router calls: keep them cheap.
//! - Observers only see events; they cannot reach the router from `on_event`.
//! - A panic inside an observer is caught and reported; other observers still run.
//!
//! ## Example
//! ```rust
//! use std::cell::Cell;
//! use wcrouter::{Event, EventKind, Observe};
//!
//! #[derive(Default)]
//! struct CountLoads(Cell<usize>);
//!
//! impl Observe for CountLoads {
//!     fn on_event(&self, ev: &Event) {
//!         if ev.kind == EventKind::ComponentLoaded {
//!             self.0.set(self.0.get() + 1);
//!         }
//!     }
//!     fn name(&self) -> &'static str { "count-loads" }
//! }
//! ```

use crate::events::Event;

/// Contract for event observers.
pub trait Observe {
    /// Handle a single event.
    fn on_event(&self, event: &Event);

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
