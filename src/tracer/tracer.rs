//! # Topic graph and per-call response tracking.
//!
//! One [`EventTracer`] exists per publisher topic that ever had a subscriber. It holds:
//! - the static graph: subscriber id → subscriber events (duplicates are distinct targets);
//! - one [`CallRecord`] per open publish call, keyed by [`CallId`].
//!
//! ## Call lifecycle
//! ```text
//! begin_call ──► record_sub (per delivery) ──► seal ──► resolve* ──► Completion
//!                      ▲                          │
//!                      └── resolve during dispatch┘ (sync responders)
//! ```
//! A record completes once it is sealed and every delivery has all its slots filled.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use crate::error::SignalError;

use super::signal::{CallId, ResumeSignal};

/// Responses collected from one subscriber event during one call.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Subscriber full event name.
    pub subscriber: String,
    /// Resumed values in slot order.
    pub values: Vec<Value>,
}

/// Callback invoked once all responders of a call have resumed.
pub type ResponseCallback = Box<dyn FnOnce(Vec<Response>)>;

/// A finished call: the callback and what to pass it.
///
/// Produced under the tracer borrow, fired after it is released.
pub(crate) struct Completion {
    pub topic: String,
    pub call: CallId,
    callback: ResponseCallback,
    responses: Vec<Response>,
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("topic", &self.topic)
            .field("call", &self.call)
            .field("responses", &self.responses)
            .finish_non_exhaustive()
    }
}

impl Completion {
    pub fn responders(&self) -> usize {
        self.responses.len()
    }

    pub fn fire(self) {
        (self.callback)(self.responses)
    }
}

#[derive(Clone)]
enum Slot {
    Open,
    Filled(Value),
    /// Reserved for a handler that did not run (a once-handler consumed elsewhere).
    Void,
}

struct SubRecord {
    topic: String,
    deliveries: usize,
    responses: Vec<Slot>,
    filled: usize,
    done: bool,
}

struct CallRecord {
    pairs: usize,
    completed: usize,
    sealed: bool,
    subs: Vec<SubRecord>,
    callback: Option<ResponseCallback>,
}

impl CallRecord {
    fn is_complete(&self) -> bool {
        self.sealed && self.completed >= self.pairs
    }
}

/// Subscriptions and open calls of one publisher topic.
pub struct EventTracer {
    publisher: String,
    event: String,
    topic: String,
    subscribers: Vec<(String, Vec<String>)>,
    calls: HashMap<CallId, CallRecord>,
}

impl EventTracer {
    /// Creates an empty tracer for `publisher`'s `event`.
    pub fn new(publisher: impl Into<String>, event: impl Into<String>) -> Self {
        let publisher = publisher.into();
        let event = event.into();
        let topic = crate::components::full_name(&publisher, &event);
        Self {
            publisher,
            event,
            topic,
            subscribers: Vec::new(),
            calls: HashMap::new(),
        }
    }

    pub fn publisher(&self) -> &str {
        &self.publisher
    }

    pub fn event(&self) -> &str {
        &self.event
    }

    /// Full event name of the publisher topic.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Appends `event` to `subscriber`'s target list. Duplicates are kept.
    pub fn add_subscriber(&mut self, subscriber: &str, event: &str) {
        match self.subscribers.iter_mut().find(|(id, _)| id == subscriber) {
            Some((_, events)) => events.push(event.to_string()),
            None => self
                .subscribers
                .push((subscriber.to_string(), vec![event.to_string()])),
        }
    }

    /// True if `subscriber` already targets `event`.
    pub fn has_subscription(&self, subscriber: &str, event: &str) -> bool {
        self.subscribers
            .iter()
            .any(|(id, events)| id == subscriber && events.iter().any(|e| e == event))
    }

    /// Subscriber graph in insertion order.
    pub fn subscribers(&self) -> &[(String, Vec<String>)] {
        &self.subscribers
    }

    /// Drops subscribers for which `keep` returns false. Returns the dropped ids.
    pub(crate) fn prune(&mut self, mut keep: impl FnMut(&str, &[String]) -> bool) -> Vec<String> {
        let mut dropped = Vec::new();
        self.subscribers.retain(|(id, events)| {
            let k = keep(id, events);
            if !k {
                dropped.push(id.clone());
            }
            k
        });
        dropped
    }

    /// Number of calls still waiting for responses.
    pub fn open_calls(&self) -> usize {
        self.calls.len()
    }

    pub(crate) fn begin_call(&mut self, call: CallId, callback: Option<ResponseCallback>) {
        self.calls.insert(
            call,
            CallRecord {
                pairs: 0,
                completed: 0,
                sealed: false,
                subs: Vec::new(),
                callback,
            },
        );
    }

    /// Registers one delivery of `call` to `subscriber` with `handlers` slots.
    ///
    /// Returns the slot offset of this delivery, or `None` if the call is closed.
    pub(crate) fn record_sub(
        &mut self,
        call: CallId,
        subscriber: &str,
        handlers: usize,
    ) -> Option<usize> {
        let record = self.calls.get_mut(&call)?;
        record.pairs += 1;

        match record.subs.iter_mut().find(|s| s.topic == subscriber) {
            Some(sub) => {
                let base = sub.responses.len();
                sub.responses.resize(base + handlers, Slot::Open);
                if sub.done {
                    sub.done = false;
                    record.completed -= sub.deliveries;
                }
                sub.deliveries += 1;
                Some(base)
            }
            None => {
                record.subs.push(SubRecord {
                    topic: subscriber.to_string(),
                    deliveries: 1,
                    responses: vec![Slot::Open; handlers],
                    filled: 0,
                    done: false,
                });
                Some(0)
            }
        }
    }

    /// Marks the end of dispatch for `call`.
    ///
    /// Records without a callback or without responders are discarded.
    pub(crate) fn seal(&mut self, call: CallId) -> Option<Completion> {
        let record = self.calls.get_mut(&call)?;
        record.sealed = true;
        if record.callback.is_none() || record.pairs == 0 {
            self.calls.remove(&call);
            return None;
        }
        self.take_if_complete(call)
    }

    /// Stores `data` in `slot` of `subscriber`'s sub-record for `call`.
    pub(crate) fn resolve(
        &mut self,
        call: CallId,
        subscriber: &str,
        slot: usize,
        data: Value,
    ) -> Result<Option<Completion>, SignalError> {
        let record = self.calls.get_mut(&call).ok_or_else(|| SignalError::CallClosed {
            topic: self.topic.clone(),
            call: call.0,
        })?;
        let sub = record
            .subs
            .iter_mut()
            .find(|s| s.topic == subscriber)
            .ok_or_else(|| SignalError::UnknownSubscriber {
                subscriber: subscriber.to_string(),
                call: call.0,
            })?;
        let cell = sub
            .responses
            .get_mut(slot)
            .ok_or_else(|| SignalError::SlotOutOfRange {
                subscriber: subscriber.to_string(),
                slot,
            })?;

        match cell {
            Slot::Open => sub.filled += 1,
            Slot::Filled(_) => {}
            Slot::Void => {
                return Err(SignalError::SlotOutOfRange {
                    subscriber: subscriber.to_string(),
                    slot,
                })
            }
        }
        *cell = Slot::Filled(data);
        if !sub.done && sub.filled == sub.responses.len() {
            sub.done = true;
            record.completed += sub.deliveries;
        }
        Ok(self.take_if_complete(call))
    }

    /// Releases `slot` of `subscriber`'s sub-record for `call` without a response.
    ///
    /// Used for handlers that were counted for a delivery but never ran. The slot no longer
    /// holds the call open and contributes no value.
    pub(crate) fn void_slot(&mut self, call: CallId, subscriber: &str, slot: usize) {
        let Some(record) = self.calls.get_mut(&call) else {
            return;
        };
        let Some(sub) = record.subs.iter_mut().find(|s| s.topic == subscriber) else {
            return;
        };
        match sub.responses.get_mut(slot) {
            Some(cell) if matches!(cell, Slot::Open) => *cell = Slot::Void,
            _ => return,
        }
        sub.filled += 1;
        if !sub.done && sub.filled == sub.responses.len() {
            sub.done = true;
            record.completed += sub.deliveries;
        }
    }

    fn take_if_complete(&mut self, call: CallId) -> Option<Completion> {
        if !self.calls.get(&call)?.is_complete() {
            return None;
        }
        let record = self.calls.remove(&call)?;
        let callback = record.callback?;
        let responses = record
            .subs
            .into_iter()
            .map(|s| Response {
                subscriber: s.topic,
                values: s
                    .responses
                    .into_iter()
                    .filter_map(|slot| match slot {
                        Slot::Filled(v) => Some(v),
                        Slot::Open | Slot::Void => None,
                    })
                    .collect(),
            })
            .collect();
        Some(Completion {
            topic: self.topic.clone(),
            call,
            callback,
            responses,
        })
    }
}

/// All tracers of a router, keyed by publisher full event name.
#[derive(Default)]
pub struct TracerCache {
    tracers: HashMap<String, EventTracer>,
}

impl TracerCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, topic: &str) -> Option<&EventTracer> {
        self.tracers.get(topic)
    }

    pub(crate) fn get_mut(&mut self, topic: &str) -> Option<&mut EventTracer> {
        self.tracers.get_mut(topic)
    }

    /// Returns the tracer of `publisher`'s `event`, creating it if needed.
    pub fn get_or_create(&mut self, publisher: &str, event: &str) -> &mut EventTracer {
        let topic = crate::components::full_name(publisher, event);
        self.tracers
            .entry(topic)
            .or_insert_with(|| EventTracer::new(publisher, event))
    }

    /// Number of tracers.
    pub fn len(&self) -> usize {
        self.tracers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracers.is_empty()
    }

    /// Routes a resume signal to its call record.
    pub(crate) fn resolve(
        &mut self,
        signal: &ResumeSignal,
        data: Value,
    ) -> Result<Option<Completion>, SignalError> {
        let tracer = self
            .tracers
            .get_mut(signal.topic())
            .ok_or_else(|| SignalError::UnknownTracer {
                topic: signal.topic().to_string(),
            })?;
        tracer.resolve(signal.call(), signal.subscriber(), signal.slot(), data)
    }
}
