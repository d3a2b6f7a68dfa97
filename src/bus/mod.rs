//! Named-channel publish/subscribe primitive.
//!
//! This module groups the low-level bus the router delivers through. It knows nothing
//! about components: channels are plain strings and handlers receive an opaque
//! per-invocation context `C` plus the argument list.
//!
//! ## Contents
//! - [`EventBus`] channels, once-handlers, snapshot + reverse-order dispatch
//! - [`Recorder`] hook the tracer plugs into a dispatch to learn handler positions
//! - [`HandlerId`] identity of one registration, used by `unsubscribe`
//!
//! ## Dispatch order
//! ```text
//! subscribe(h1) subscribe(h2) subscribe(h3)
//! publish ──► snapshot [h1, h2, h3] ──► h3(idx 2) ──► h2(idx 1) ──► h1(idx 0)
//! ```

mod event_bus;
mod handler;

pub use event_bus::{into_args, EventBus, Recorder, CHANNEL_LIST_SEPARATOR};
pub use handler::{Handler, HandlerId};
