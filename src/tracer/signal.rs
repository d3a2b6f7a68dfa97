//! # Resume signals.
//!
//! A [`ResumeSignal`] pinpoints one handler invocation of one publish call:
//!
//! ```text
//! publisher :: publisher_topic :: call :: subscriber_topic :: slot
//!   "nav"   ::    "nav_open"   ::  7   ::  "panel_show"    ::  1
//! ```
//!
//! The string form is stable so signals can travel through opaque channels (timers, external
//! callbacks) and come back through [`ResumeSignal::from_str`](std::str::FromStr).

use std::fmt;
use std::str::FromStr;

use crate::error::SignalError;

/// Separator between the five fields of a signal's string form.
pub const SIGNAL_SEPARATOR: &str = "::";

/// Identity of one publish call on one topic.
///
/// Router-local and strictly increasing, so overlapping calls never share state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallId(pub u64);

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque token returned by [`Invocation::pause`](crate::Invocation::pause).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResumeSignal {
    publisher: String,
    topic: String,
    call: CallId,
    subscriber: String,
    slot: usize,
}

impl ResumeSignal {
    pub(crate) fn new(
        publisher: impl Into<String>,
        topic: impl Into<String>,
        call: CallId,
        subscriber: impl Into<String>,
        slot: usize,
    ) -> Self {
        Self {
            publisher: publisher.into(),
            topic: topic.into(),
            call,
            subscriber: subscriber.into(),
            slot,
        }
    }

    /// Publishing component id.
    pub fn publisher(&self) -> &str {
        &self.publisher
    }

    /// Publisher full event name.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Call the signal belongs to.
    pub fn call(&self) -> CallId {
        self.call
    }

    /// Subscriber full event name.
    pub fn subscriber(&self) -> &str {
        &self.subscriber
    }

    /// Handler slot within the subscriber's deliveries for this call.
    pub fn slot(&self) -> usize {
        self.slot
    }
}

impl fmt::Display for ResumeSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = SIGNAL_SEPARATOR;
        write!(
            f,
            "{}{sep}{}{sep}{}{sep}{}{sep}{}",
            self.publisher, self.topic, self.call, self.subscriber, self.slot
        )
    }
}

impl FromStr for ResumeSignal {
    type Err = SignalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || SignalError::Malformed {
            signal: s.to_string(),
        };

        let parts: Vec<&str> = s.split(SIGNAL_SEPARATOR).collect();
        let [publisher, topic, call, subscriber, slot] = parts.as_slice() else {
            return Err(malformed());
        };
        if publisher.is_empty() || topic.is_empty() || subscriber.is_empty() {
            return Err(malformed());
        }
        let call = call.parse::<u64>().map_err(|_| malformed())?;
        let slot = slot.parse::<usize>().map_err(|_| malformed())?;

        Ok(Self::new(*publisher, *topic, CallId(call), *subscriber, slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_form() {
        let sig = ResumeSignal::new("nav", "nav_open", CallId(7), "panel_show", 1);
        assert_eq!(sig.to_string(), "nav::nav_open::7::panel_show::1");

        let back: ResumeSignal = sig.to_string().parse().unwrap();
        assert_eq!(back, sig);
    }

    #[test]
    fn test_rejects_malformed() {
        for bad in [
            "",
            "a::b::c",
            "a::a_x::notanumber::b_y::0",
            "a::a_x::1::b_y::-1",
            "a::a_x::1::b_y::0::extra",
            "::a_x::1::b_y::0",
        ] {
            let err = bad.parse::<ResumeSignal>().unwrap_err();
            assert_eq!(err.as_label(), "signal_malformed", "input {bad:?}");
        }
    }
}
