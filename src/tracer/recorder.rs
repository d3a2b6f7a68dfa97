//! Per-dispatch recorder and the context handed to each handler.

use std::cell::RefCell;

use serde_json::Value;
use tracing::debug;

use crate::bus::Recorder;
use crate::core::{Router, WeakRouter};
use crate::events::{Event, EventKind};

use super::signal::{CallId, ResumeSignal};
use super::tracer::TracerCache;

/// Context of one handler invocation.
///
/// Carries the exact position of the invocation inside its publish call, so a handler can
/// [`pause`](Invocation::pause) and answer later, from anywhere, with
/// [`resume`](Invocation::resume). Handlers reached without tracing (host topics, untraced bus
/// use) get an invocation whose `pause` returns `None`.
#[derive(Clone, Default)]
pub struct Invocation {
    signal: Option<ResumeSignal>,
    router: WeakRouter,
}

impl Invocation {
    pub(crate) fn traced(signal: ResumeSignal, router: WeakRouter) -> Self {
        Self {
            signal: Some(signal),
            router,
        }
    }

    pub(crate) fn detached(router: WeakRouter) -> Self {
        Self {
            signal: None,
            router,
        }
    }

    /// Returns the signal identifying this invocation.
    ///
    /// Pure: calling it again, or after other handlers ran, yields the same signal.
    pub fn pause(&self) -> Option<ResumeSignal> {
        self.signal.clone()
    }

    /// True if this invocation belongs to a traced publish call.
    pub fn is_traced(&self) -> bool {
        self.signal.is_some()
    }

    /// Reports `data` for `signal`.
    ///
    /// A signal that no longer matches an open call is dropped (logged at debug level and
    /// reported as [`EventKind::SignalDropped`]).
    pub fn resume(&self, signal: &ResumeSignal, data: Value) {
        let Some(router) = self.router.upgrade() else {
            debug!(signal = %signal, "resume after router drop");
            return;
        };
        if let Err(err) = router.resume(signal, data) {
            debug!(signal = %signal, label = err.as_label(), "resume signal dropped");
            router.emit(
                Event::new(EventKind::SignalDropped)
                    .with_component(signal.publisher())
                    .with_topic(signal.topic())
                    .with_reason(err.as_message()),
            );
        }
    }

    /// Router that dispatched this invocation, if it is still alive.
    pub fn router(&self) -> Option<Router> {
        self.router.upgrade()
    }
}

/// Bus recorder that threads one publish call through the tracer.
pub(crate) struct CallRecorder<'a> {
    tracers: &'a RefCell<TracerCache>,
    router: WeakRouter,
    publisher: String,
    topic: String,
    call: CallId,
    current: Option<(String, usize)>,
}

impl<'a> CallRecorder<'a> {
    pub fn new(
        tracers: &'a RefCell<TracerCache>,
        router: WeakRouter,
        publisher: &str,
        topic: &str,
        call: CallId,
    ) -> Self {
        Self {
            tracers,
            router,
            publisher: publisher.to_string(),
            topic: topic.to_string(),
            call,
            current: None,
        }
    }
}

impl Recorder<Invocation> for CallRecorder<'_> {
    fn sub(&mut self, channel: &str, handler_count: usize) {
        let base = self
            .tracers
            .borrow_mut()
            .get_mut(&self.topic)
            .and_then(|t| t.record_sub(self.call, channel, handler_count));
        self.current = base.map(|b| (channel.to_string(), b));
    }

    fn handler_index(&mut self, index: usize) -> Invocation {
        match &self.current {
            Some((subscriber, base)) => Invocation::traced(
                ResumeSignal::new(
                    &self.publisher,
                    &self.topic,
                    self.call,
                    subscriber,
                    base + index,
                ),
                self.router.clone(),
            ),
            None => Invocation::detached(self.router.clone()),
        }
    }

    fn skip(&mut self, index: usize) {
        if let Some((subscriber, base)) = &self.current {
            if let Some(t) = self.tracers.borrow_mut().get_mut(&self.topic) {
                t.void_slot(self.call, subscriber, base + index);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_recorder_offsets_slots_per_delivery() {
        let tracers = RefCell::new(TracerCache::new());
        {
            let mut cache = tracers.borrow_mut();
            let t = cache.get_or_create("a", "x");
            t.add_subscriber("b", "y");
            t.begin_call(CallId(1), None);
        }

        let mut rec = CallRecorder::new(&tracers, WeakRouter::default(), "a", "a_x", CallId(1));
        rec.sub("b_y", 2);
        let first = rec.handler_index(1).pause().unwrap();
        rec.sub("b_y", 1);
        let second = rec.handler_index(0).pause().unwrap();

        assert_eq!(first.to_string(), "a::a_x::1::b_y::1");
        assert_eq!(second.slot(), 2);
    }

    #[test]
    fn test_skipped_handler_does_not_hold_call_open() {
        let tracers = RefCell::new(TracerCache::new());
        let done = Rc::new(Cell::new(false));
        {
            let mut cache = tracers.borrow_mut();
            let t = cache.get_or_create("a", "x");
            t.add_subscriber("b", "y");
            let flag = Rc::clone(&done);
            t.begin_call(CallId(1), Some(Box::new(move |_| flag.set(true))));
        }

        let mut rec = CallRecorder::new(&tracers, WeakRouter::default(), "a", "a_x", CallId(1));
        rec.sub("b_y", 2);
        let sig = rec.handler_index(1).pause().unwrap();
        rec.skip(0);

        let mut cache = tracers.borrow_mut();
        assert!(cache.resolve(&sig, json!("ok")).unwrap().is_none());
        let t = cache.get_mut("a_x").unwrap();
        t.seal(CallId(1)).unwrap().fire();
        assert!(done.get());
        assert_eq!(t.open_calls(), 0);
    }

    #[test]
    fn test_closed_call_yields_untraced_invocation() {
        let tracers = RefCell::new(TracerCache::new());
        let mut rec = CallRecorder::new(&tracers, WeakRouter::default(), "a", "a_x", CallId(1));
        rec.sub("b_y", 1);
        let inv = rec.handler_index(0);
        assert!(!inv.is_traced());
        assert!(inv.router().is_none());
    }
}
