//! # LogWriter: events to `tracing`
//!
//! Maps each [`Event`] onto a `tracing` macro under the `wcrouter` target. Install any
//! `tracing` subscriber (the demos use `tracing-subscriber` with `EnvFilter`) to see them.
//!
//! | kinds | level |
//! |---|---|
//! | `FetchFailed`, `ObserverPanicked` | `warn` |
//! | `ConfigWarning` | `debug` (the router already warns at the call site) |
//! | lifecycle, fetch, call completion | `debug` |
//! | per-delivery (`DeliveryBuffered`, `BufferReplayed`, `SignalDropped`, `SubscriberPruned`) | `trace` |
//!
//! ## Example output
//! ```text
//! DEBUG wcrouter: fetch started url="/cmps/panel.js" components=1
//! TRACE wcrouter: delivery buffered component="panel" topic="nav_open"
//! DEBUG wcrouter: component loaded component="panel"
//! ```

use tracing::{debug, trace, warn};

use crate::events::{Event, EventKind};
use crate::observers::Observe;

#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Observe for LogWriter {
    fn on_event(&self, e: &Event) {
        let component = e.component.as_deref().unwrap_or("-");
        let topic = e.topic.as_deref().unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("-");
        let count = e.count.unwrap_or(0);

        match e.kind {
            EventKind::FetchFailed => {
                warn!(target: "wcrouter", reason, components = count, "fetch failed");
            }
            EventKind::ObserverPanicked => {
                warn!(target: "wcrouter", observer = component, reason, "observer panicked");
            }
            EventKind::ConfigWarning => {
                debug!(target: "wcrouter", component, reason, "config warning");
            }
            EventKind::ComponentCreated => {
                debug!(target: "wcrouter", component, "component created");
            }
            EventKind::ComponentDefined => {
                debug!(target: "wcrouter", component, copies = count, "component defined");
            }
            EventKind::FetchStarted => {
                debug!(target: "wcrouter", url = reason, components = count, "fetch started");
            }
            EventKind::FetchSucceeded => {
                debug!(target: "wcrouter", url = reason, definitions = count, "fetch succeeded");
            }
            EventKind::ComponentLoaded => {
                debug!(target: "wcrouter", component, "component loaded");
            }
            EventKind::CallCompleted => {
                debug!(target: "wcrouter", topic, responders = count, "call completed");
            }
            EventKind::DeliveryBuffered => {
                trace!(target: "wcrouter", component, topic, "delivery buffered");
            }
            EventKind::BufferReplayed => {
                trace!(target: "wcrouter", component, topic, "buffer replayed");
            }
            EventKind::SubscriberPruned => {
                trace!(target: "wcrouter", component, topic, "subscriber pruned");
            }
            EventKind::SignalDropped => {
                trace!(target: "wcrouter", topic, reason, "signal dropped");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
