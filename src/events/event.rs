//! # Runtime events emitted by the router.
//!
//! The [`EventKind`] enum classifies event types across four categories:
//! - **Component lifecycle**: created, defined, fetched, loaded
//! - **Delivery**: buffered while a subscriber is not loaded, replayed on load, pruned
//! - **Response collection**: calls completed, resume signals dropped
//! - **Diagnostics**: configuration warnings, observer panics
//!
//! The [`Event`] struct carries additional metadata such as the component id, the topic
//! involved, a reason and a count.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use wcrouter::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::DeliveryBuffered)
//!     .with_component("panel")
//!     .with_topic("nav_open");
//!
//! assert_eq!(ev.kind, EventKind::DeliveryBuffered);
//! assert_eq!(ev.component.as_deref(), Some("panel"));
//! assert_eq!(ev.topic.as_deref(), Some("nav_open"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    // === Component lifecycle ===
    /// A component record was created on first reference.
    ///
    /// Sets:
    /// - `component`: component id
    ComponentCreated,

    /// A component received its factory (`define` or fetched bundle).
    ///
    /// Sets:
    /// - `component`: component id
    /// - `count`: number of copies defined alongside it
    ComponentDefined,

    /// A fetch request was issued.
    ///
    /// Sets:
    /// - `reason`: request url
    /// - `count`: number of components requested
    FetchStarted,

    /// A script fetch resolved.
    ///
    /// Sets:
    /// - `reason`: request url
    /// - `count`: number of definitions received
    FetchSucceeded,

    /// A fetch failed; requested components moved to `Error`.
    ///
    /// Sets:
    /// - `reason`: failure message
    /// - `count`: number of components affected
    FetchFailed,

    /// A component's factory ran.
    ///
    /// Sets:
    /// - `component`: component id
    ComponentLoaded,

    // === Delivery ===
    /// A delivery was buffered for a subscriber that is not loaded.
    ///
    /// Sets:
    /// - `component`: subscriber id
    /// - `topic`: publisher full event name
    DeliveryBuffered,

    /// A buffered delivery was replayed after load.
    ///
    /// Sets:
    /// - `component`: subscriber id
    /// - `topic`: publisher full event name
    BufferReplayed,

    /// A subscriber vanished (unknown id or no events) and was removed from a topic.
    ///
    /// Sets:
    /// - `component`: subscriber id
    /// - `topic`: publisher full event name
    SubscriberPruned,

    // === Response collection ===
    /// Every responder of a call resumed; the callback ran.
    ///
    /// Sets:
    /// - `topic`: publisher full event name
    /// - `count`: number of subscriber events that responded
    CallCompleted,

    /// A resume signal matched no open call.
    ///
    /// Sets:
    /// - `component`: publisher id
    /// - `topic`: publisher full event name
    /// - `reason`: protocol error message
    SignalDropped,

    // === Diagnostics ===
    /// A setup call was rejected and ignored.
    ///
    /// Sets:
    /// - `component`: component id, when known
    /// - `reason`: error message
    ConfigWarning,

    /// An observer panicked while handling an event.
    ///
    /// Sets:
    /// - `component`: observer name
    /// - `reason`: panic message
    ObserverPanicked,
}

impl EventKind {
    /// Stable snake_case label.
    pub fn as_label(self) -> &'static str {
        match self {
            EventKind::ComponentCreated => "component_created",
            EventKind::ComponentDefined => "component_defined",
            EventKind::FetchStarted => "fetch_started",
            EventKind::FetchSucceeded => "fetch_succeeded",
            EventKind::FetchFailed => "fetch_failed",
            EventKind::ComponentLoaded => "component_loaded",
            EventKind::DeliveryBuffered => "delivery_buffered",
            EventKind::BufferReplayed => "buffer_replayed",
            EventKind::SubscriberPruned => "subscriber_pruned",
            EventKind::CallCompleted => "call_completed",
            EventKind::SignalDropped => "signal_dropped",
            EventKind::ConfigWarning => "config_warning",
            EventKind::ObserverPanicked => "observer_panicked",
        }
    }
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Debug, Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Component id, if applicable.
    pub component: Option<Arc<str>>,
    /// Full event name, if applicable.
    pub topic: Option<Arc<str>>,
    /// Human-readable reason (errors, urls, etc.).
    pub reason: Option<Arc<str>>,
    /// Kind-specific count.
    pub count: Option<usize>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            component: None,
            topic: None,
            reason: None,
            count: None,
        }
    }

    /// Attaches a component id.
    #[inline]
    pub fn with_component(mut self, id: impl Into<Arc<str>>) -> Self {
        self.component = Some(id.into());
        self
    }

    /// Attaches a full event name.
    #[inline]
    pub fn with_topic(mut self, topic: impl Into<Arc<str>>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    #[inline]
    pub fn with_count(mut self, n: usize) -> Self {
        self.count = Some(n);
        self
    }

    /// Creates an observer panic event.
    #[inline]
    pub fn observer_panicked(observer: &'static str, info: String) -> Self {
        Event::new(EventKind::ObserverPanicked)
            .with_component(observer)
            .with_reason(info)
    }

    #[inline]
    pub fn is_warning(&self) -> bool {
        matches!(
            self.kind,
            EventKind::ConfigWarning | EventKind::FetchFailed | EventKind::ObserverPanicked
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::ComponentCreated);
        let b = Event::new(EventKind::ComponentCreated);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_warning_kinds() {
        assert!(Event::new(EventKind::ConfigWarning).is_warning());
        assert!(Event::observer_panicked("x", "boom".into()).is_warning());
        assert!(!Event::new(EventKind::ComponentLoaded).is_warning());
        assert_eq!(EventKind::SignalDropped.as_label(), "signal_dropped");
    }
}
