//! Runtime events: the data model observers receive.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//!
//! ## Quick reference
//! - **Publishers**: `Router` (define, fetch, load, publish, resume), `ObserverSet` (panics).
//! - **Consumers**: [`Observe`](crate::observers::Observe) implementations held by the router's
//!   `ObserverSet`, e.g. [`LogWriter`](crate::observers::LogWriter).

mod event;

pub use event::{Event, EventKind};
