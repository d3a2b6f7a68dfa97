//! Error types used by the router, the tracer and component state machines.
//!
//! This module defines four error enums:
//!
//! - [`RouterError`]: configuration mistakes made while wiring a page (never returned to callers
//!   of setup APIs; reported through the warning channel instead).
//! - [`SignalError`]: resume signals that no longer match an in-flight call.
//! - [`FetchError`]: failures reported by the injected fetch capability.
//! - [`TransitionError`]: programmer errors: a state change that the transition table forbids.
//!
//! All of them provide `as_label` (stable snake_case label for logs/metrics) and `as_message`.

use thiserror::Error;

/// # Configuration errors.
///
/// Raised while a page is being set up (definitions, declarations, injections).
/// The router never propagates these: it emits a
/// [`ConfigWarning`](crate::EventKind::ConfigWarning) event and turns the call into a no-op.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    /// A component id was empty.
    #[error("component id must not be empty")]
    MissingId,

    /// A component id or event name contains a reserved separator.
    #[error("name {name:?} contains the reserved separator {separator:?}")]
    InvalidName {
        /// The rejected name.
        name: String,
        /// The separator it contains.
        separator: &'static str,
    },

    /// A host topic outside the lifecycle whitelist.
    #[error("unknown host topic {topic:?}")]
    UnknownHostTopic {
        /// The rejected topic.
        topic: String,
    },

    /// A capability injected under a usage name that is not whitelisted.
    #[error("unknown capability usage {usage:?}")]
    UnknownCapability {
        /// The rejected usage name.
        usage: String,
    },

    /// `define` was called for a component whose factory already ran.
    #[error("component {id:?} is already loaded; factory not replaced")]
    AlreadyLoaded {
        /// Component id.
        id: String,
    },

    /// A script fetch succeeded but did not provide the requested component.
    #[error("fetched bundle did not define component {id:?}")]
    MissingDefinition {
        /// Component id.
        id: String,
    },
}

impl RouterError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use wcrouter::RouterError;
    ///
    /// assert_eq!(RouterError::MissingId.as_label(), "router_missing_id");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RouterError::MissingId => "router_missing_id",
            RouterError::InvalidName { .. } => "router_invalid_name",
            RouterError::UnknownHostTopic { .. } => "router_unknown_host_topic",
            RouterError::UnknownCapability { .. } => "router_unknown_capability",
            RouterError::AlreadyLoaded { .. } => "router_already_loaded",
            RouterError::MissingDefinition { .. } => "router_missing_definition",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RouterError::MissingId => "empty component id".to_string(),
            RouterError::InvalidName { name, separator } => {
                format!("invalid name {name:?} (contains {separator:?})")
            }
            RouterError::UnknownHostTopic { topic } => format!("unknown host topic: {topic}"),
            RouterError::UnknownCapability { usage } => format!("unknown capability: {usage}"),
            RouterError::AlreadyLoaded { id } => format!("already loaded: {id}"),
            RouterError::MissingDefinition { id } => format!("missing definition: {id}"),
        }
    }
}

/// # Resume-signal protocol errors.
///
/// A signal that cannot be matched means the window for that response already closed.
/// Callers inside handlers go through [`Invocation::resume`](crate::Invocation::resume),
/// which drops these silently.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    /// The token does not have the expected five fields.
    #[error("malformed resume signal {signal:?}")]
    Malformed {
        /// The rejected token.
        signal: String,
    },

    /// No tracer exists for the publisher topic.
    #[error("no tracer for topic {topic:?}")]
    UnknownTracer {
        /// Publisher full event name.
        topic: String,
    },

    /// The call finished (or was discarded) already.
    #[error("call {call} of {topic:?} is closed")]
    CallClosed {
        /// Publisher full event name.
        topic: String,
        /// Call identity.
        call: u64,
    },

    /// The call never delivered to this subscriber event.
    #[error("call {call} never reached subscriber {subscriber:?}")]
    UnknownSubscriber {
        /// Subscriber full event name.
        subscriber: String,
        /// Call identity.
        call: u64,
    },

    /// The handler slot is outside the delivery's handler range.
    #[error("slot {slot} out of range for subscriber {subscriber:?}")]
    SlotOutOfRange {
        /// Subscriber full event name.
        subscriber: String,
        /// Reported slot.
        slot: usize,
    },
}

impl SignalError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            SignalError::Malformed { .. } => "signal_malformed",
            SignalError::UnknownTracer { .. } => "signal_unknown_tracer",
            SignalError::CallClosed { .. } => "signal_call_closed",
            SignalError::UnknownSubscriber { .. } => "signal_unknown_subscriber",
            SignalError::SlotOutOfRange { .. } => "signal_slot_out_of_range",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        self.to_string()
    }
}

/// # Errors reported by the fetch capability.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The resource could not be retrieved.
    #[error("fetch of {url} failed: {reason}")]
    Failed {
        /// Requested url.
        url: String,
        /// Transport-specific reason.
        reason: String,
    },

    /// The fetch capability cannot serve requests at all.
    #[error("fetch capability unavailable")]
    Unavailable,
}

impl FetchError {
    /// Convenience constructor for [`FetchError::Failed`].
    pub fn failed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        FetchError::Failed {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use wcrouter::FetchError;
    ///
    /// let err = FetchError::failed("/cmps/a.js", "404");
    /// assert_eq!(err.as_label(), "fetch_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            FetchError::Failed { .. } => "fetch_failed",
            FetchError::Unavailable => "fetch_unavailable",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            FetchError::Failed { url, reason } => format!("{url}: {reason}"),
            FetchError::Unavailable => "unavailable".to_string(),
        }
    }
}

/// # State-machine programmer errors.
///
/// Returned synchronously when code asks for a transition the table does not allow.
/// These indicate an authoring bug rather than a runtime condition.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// The transition exists but not from the current state.
    #[error("cannot apply {transition:?} from state {from}")]
    Invalid {
        /// Current state (debug-formatted).
        from: String,
        /// Requested transition.
        transition: String,
    },

    /// No transition with this name was declared.
    #[error("undefined transition {name:?}")]
    Undefined {
        /// Requested transition name.
        name: String,
    },

    /// The machine was used before `init`.
    #[error("state machine used before init")]
    Uninitialized,

    /// The component does not exist.
    #[error("unknown component {id:?}")]
    UnknownComponent {
        /// Component id.
        id: String,
    },
}

impl TransitionError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use wcrouter::TransitionError;
    ///
    /// let err = TransitionError::Undefined { name: "open".into() };
    /// assert_eq!(err.as_label(), "transition_undefined");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TransitionError::Invalid { .. } => "transition_invalid",
            TransitionError::Undefined { .. } => "transition_undefined",
            TransitionError::Uninitialized => "transition_uninitialized",
            TransitionError::UnknownComponent { .. } => "transition_unknown_component",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        self.to_string()
    }
}
