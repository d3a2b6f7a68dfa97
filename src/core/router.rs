//! # Router: the single entry point of a page.
//!
//! A [`Router`] owns everything one page needs: the component registry, the topic graph
//! (tracers), the pending-delivery buffer, the loader state and the handler bus. It is a cheap
//! `Rc` handle; clones share the same page.
//!
//! ## Architecture
//! ```text
//! Router (Rc<Inner>)
//!   ├─ bus: EventBus<Invocation>        handlers, keyed by "{component}_{event}"
//!   ├─ tracers: RefCell<TracerCache>    topic graph + open calls
//!   ├─ state: RefCell<State>
//!   │     ├─ registry: Registry         components in creation order
//!   │     ├─ pending: PendingBuffer     deliveries waiting for a load
//!   │     └─ loader: LoaderState        remaining list + dirty flag
//!   ├─ fetches: queued fetch futures    driven by settle().await
//!   └─ observers: ObserverSet           lifecycle events
//! ```
//!
//! ## Publish
//! ```text
//! publish(a, x, data)
//!   ├─► tracer "a_x"? no ─► no-op
//!   ├─► prune vanished subscribers
//!   ├─► per subscriber:
//!   │     Unfetched/Error ─► buffer + queue fetch
//!   │     Fetching        ─► buffer
//!   │     Fetched         ─► load, then deliver
//!   │     Loaded          ─► deliver (events walked from the end)
//!   └─► seal call ─► callback now if every responder already resumed
//! ```
//!
//! ## Rules
//! - No `RefCell` borrow is held across a handler, factory, callback or `.await`, so handlers
//!   may publish, subscribe, define and resume re-entrantly.
//! - Setup mistakes never panic and never return errors: they are logged with `warn!`,
//!   reported as [`EventKind::ConfigWarning`] and ignored.

use std::any::Any;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use futures::future::LocalBoxFuture;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::bus::{EventBus, Handler, HandlerId};
use crate::capabilities::Capabilities;
use crate::components::{
    full_name, validate_name, Component, ComponentHandle, ComponentState, Declaration,
    Definition, HostTopic, Transition, ENV_ID,
};
use crate::error::{RouterError, SignalError, TransitionError};
use crate::events::{Event, EventKind};
use crate::observers::ObserverSet;
use crate::pending::PendingBuffer;
use crate::tracer::{
    CallId, CallRecorder, Completion, Invocation, Response, ResponseCallback, ResumeSignal,
    TracerCache,
};

use super::builder::RouterBuilder;
use super::config::Config;
use super::loader::{LoadReport, LoaderState};
use super::page::PageConfig;
use super::registry::Registry;

pub(crate) struct Inner {
    pub(super) cfg: Config,
    pub(super) caps: Capabilities,
    pub(super) bus: EventBus<Invocation>,
    pub(super) observers: ObserverSet,
    pub(super) state: RefCell<State>,
    pub(super) tracers: RefCell<TracerCache>,
    pub(super) fetches: RefCell<Vec<LocalBoxFuture<'static, ()>>>,
}

pub(super) struct State {
    pub registry: Registry,
    pub pending: PendingBuffer,
    pub loader: LoaderState,
    next_call: u64,
}

impl State {
    fn new() -> Self {
        let mut registry = Registry::new();
        registry.insert(Component::environment());
        Self {
            registry,
            pending: PendingBuffer::new(),
            loader: LoaderState::default(),
            next_call: 0,
        }
    }

    pub fn next_call(&mut self) -> CallId {
        self.next_call += 1;
        CallId(self.next_call)
    }
}

enum Step {
    Load(String),
    Deliver(String),
}

/// Handle to one page's router.
#[derive(Clone)]
pub struct Router {
    pub(super) inner: Rc<Inner>,
}

/// Non-owning router reference held by handles and invocations.
#[derive(Clone, Default)]
pub(crate) struct WeakRouter(Weak<Inner>);

impl WeakRouter {
    pub fn upgrade(&self) -> Option<Router> {
        self.0.upgrade().map(|inner| Router { inner })
    }
}

impl Router {
    /// Router with `cfg` and no capabilities or observers.
    pub fn new(cfg: Config) -> Self {
        RouterBuilder::new(cfg).build()
    }

    pub fn builder(cfg: Config) -> RouterBuilder {
        RouterBuilder::new(cfg)
    }

    pub(super) fn from_parts(cfg: Config, caps: Capabilities, observers: ObserverSet) -> Self {
        Self {
            inner: Rc::new(Inner {
                cfg,
                caps,
                bus: EventBus::new(),
                observers,
                state: RefCell::new(State::new()),
                tracers: RefCell::new(TracerCache::new()),
                fetches: RefCell::new(Vec::new()),
            }),
        }
    }

    pub(crate) fn downgrade(&self) -> WeakRouter {
        WeakRouter(Rc::downgrade(&self.inner))
    }

    pub fn config(&self) -> &Config {
        &self.inner.cfg
    }

    // ---- diagnostics ----

    pub(crate) fn emit(&self, event: Event) {
        if !self.inner.observers.is_empty() {
            self.inner.observers.emit(&event);
        }
    }

    pub(crate) fn warn(&self, err: RouterError, component: Option<&str>) {
        warn!(
            label = err.as_label(),
            component = component.unwrap_or("-"),
            "{err}"
        );
        let mut ev = Event::new(EventKind::ConfigWarning).with_reason(err.as_message());
        if let Some(id) = component {
            ev = ev.with_component(id);
        }
        self.emit(ev);
    }

    fn check_names(&self, names: &[&str]) -> bool {
        for name in names {
            if let Err(err) = validate_name(name) {
                self.warn(err, None);
                return false;
            }
        }
        true
    }

    fn created(&self, id: &str) {
        trace!(component = id, "component created");
        self.emit(Event::new(EventKind::ComponentCreated).with_component(id));
    }

    // ---- definition & declaration ----

    /// Defines (or redefines) component `id`.
    ///
    /// Idempotent upsert: options are shallow-merged, the factory replaced, and the component
    /// moves to `Fetched` unless it is already loaded (then only the options change and a
    /// warning is reported). Unloaded copies of `id` receive the same factory.
    pub fn define(
        &self,
        id: &str,
        options: Option<Value>,
        factory: impl Fn(&ComponentHandle) + 'static,
    ) {
        self.define_with(Definition {
            id: id.to_string(),
            options,
            factory: Rc::new(factory),
        });
    }

    /// Applies a [`Definition`], e.g. one returned by a fetch.
    pub fn define_with(&self, def: Definition) {
        if !self.check_names(&[&def.id]) {
            return;
        }

        let (created, defined, copies) = {
            let mut state = self.inner.state.borrow_mut();
            let copies = state.registry.copies_of(&def.id);
            let (cmp, created) = state.registry.ensure(&def.id);
            if let Some(options) = &def.options {
                cmp.merge_options(options);
            }
            let defined = cmp.define(Rc::clone(&def.factory)).is_ok();

            let mut n = 0;
            if defined {
                for copy in &copies {
                    if let Some(c) = state.registry.get_mut(copy) {
                        if let Some(options) = &def.options {
                            c.merge_options(options);
                        }
                        if c.define(Rc::clone(&def.factory)).is_ok() {
                            n += 1;
                        }
                    }
                }
            }
            state.loader.dirty = true;
            (created, defined, n)
        };

        if created {
            self.created(&def.id);
        }
        if defined {
            debug!(component = %def.id, copies, "component defined");
            self.emit(
                Event::new(EventKind::ComponentDefined)
                    .with_component(def.id.as_str())
                    .with_count(copies),
            );
        } else {
            self.warn(
                RouterError::AlreadyLoaded { id: def.id.clone() },
                Some(def.id.as_str()),
            );
        }
    }

    /// Starts declaring component `id` (created if unknown).
    pub fn declare(&self, id: &str) -> Declaration {
        if self.check_names(&[id]) {
            self.ensure(id);
        }
        Declaration::new(self.clone(), id)
    }

    /// Applies a whole page declaration.
    ///
    /// The page's router section is not applied here; build the router from it with
    /// [`Router::builder`].
    pub fn configure(&self, page: &PageConfig) {
        for decl in &page.components {
            let mut d = self.declare(&decl.id);
            if let Some(options) = &decl.options {
                d = d.options(options.clone());
            }
            if let Some(ctx) = &decl.context {
                d = d.context(ctx);
            } else if !decl.usage.is_empty() {
                for usage in &decl.usage {
                    d = d.usage(&usage.context, usage.options.clone());
                }
            } else if self.context(&decl.id).is_none() {
                d = d.context(&decl.default_context());
            }
            for sub in &decl.subscriptions {
                let events: Vec<&str> = sub.events.iter().map(String::as_str).collect();
                d = d.subscribe(&sub.publisher, &events, &sub.receiver);
            }
        }
    }

    fn ensure(&self, id: &str) {
        let created = {
            let mut state = self.inner.state.borrow_mut();
            state.loader.dirty = true;
            state.registry.ensure(id).1
        };
        if created {
            self.created(id);
        }
    }

    pub(crate) fn set_context(&self, id: &str, context: &str) {
        if !self.check_names(&[id]) {
            return;
        }
        self.ensure(id);
        if let Some(cmp) = self.inner.state.borrow_mut().registry.get_mut(id) {
            cmp.set_context(context);
        }
    }

    pub(crate) fn merge_options(&self, id: &str, options: &Value) {
        if !self.check_names(&[id]) {
            return;
        }
        self.ensure(id);
        if let Some(cmp) = self.inner.state.borrow_mut().registry.get_mut(id) {
            cmp.merge_options(options);
        }
    }

    /// Creates a copy of `origin` anchored to `context`. Returns the copy id.
    pub(crate) fn add_copy(
        &self,
        origin: &str,
        context: &str,
        options: Option<&Value>,
    ) -> Option<String> {
        if !self.check_names(&[origin]) {
            return None;
        }
        self.ensure(origin);
        let copy_id = {
            let mut state = self.inner.state.borrow_mut();
            let copy_id = state.registry.next_copy_id(origin);
            let mut copy = Component::copy_of(&copy_id, state.registry.get(origin)?, context);
            if let Some(options) = options {
                copy.merge_options(options);
            }
            state.registry.insert(copy);
            state.loader.dirty = true;
            copy_id
        };
        self.created(&copy_id);
        Some(copy_id)
    }

    /// Subscribes `subscriber` to `publisher`'s `events`; deliveries arrive on the
    /// subscriber's `receiver` event.
    ///
    /// Order relative to publishing does not matter: the topic graph is built lazily here and
    /// consulted on every publish.
    pub fn subscribe(&self, subscriber: &str, publisher: &str, events: &[&str], receiver: &str) {
        let mut names = vec![subscriber, publisher, receiver];
        names.extend_from_slice(events);
        if !self.check_names(&names) {
            return;
        }
        self.ensure(subscriber);

        let mut tracers = self.inner.tracers.borrow_mut();
        for event in events {
            tracers
                .get_or_create(publisher, event)
                .add_subscriber(subscriber, receiver);
        }
    }

    // ---- handlers ----

    pub(crate) fn on(
        &self,
        id: &str,
        event: &str,
        handler: Handler<Invocation>,
        once: bool,
    ) -> Option<HandlerId> {
        if !self.check_names(&[event]) {
            return None;
        }
        self.inner.bus.subscribe(&full_name(id, event), handler, once)
    }

    pub(crate) fn off(&self, id: &str, event: &str, handler: Option<HandlerId>) {
        self.inner.bus.unsubscribe(Some(&full_name(id, event)), handler);
    }

    pub(crate) fn hook(
        &self,
        id: &str,
        topic: &str,
        handler: Handler<Invocation>,
    ) -> Option<HandlerId> {
        let topic = match topic.parse::<HostTopic>() {
            Ok(t) => t,
            Err(err) => {
                self.warn(err, Some(id));
                return None;
            }
        };
        let handler_id =
            self.inner
                .bus
                .subscribe(&full_name(id, topic.as_str()), handler, topic.is_once());

        let mut tracers = self.inner.tracers.borrow_mut();
        let env = tracers.get_or_create(ENV_ID, topic.as_str());
        if !env.has_subscription(id, topic.as_str()) {
            env.add_subscriber(id, topic.as_str());
        }
        handler_id
    }

    pub fn capability(&self, usage: &str) -> Option<Rc<dyn Any>> {
        self.inner.caps.get(usage)
    }

    // ---- publish ----

    /// Publishes `publisher`'s `event`. A topic nobody subscribed to is a no-op.
    pub fn publish(&self, publisher: &str, event: &str, data: Value) {
        self.dispatch(publisher, event, data, None);
    }

    /// Publishes and collects the responses of every handler that resumes.
    ///
    /// The callback runs once, after every delivery that reached a handler has all its slots
    /// resumed. With zero responders it never runs.
    pub fn publish_with(
        &self,
        publisher: &str,
        event: &str,
        data: Value,
        callback: impl FnOnce(Vec<Response>) + 'static,
    ) {
        self.dispatch(publisher, event, data, Some(Box::new(callback)));
    }

    fn dispatch(
        &self,
        publisher: &str,
        event: &str,
        data: Value,
        callback: Option<ResponseCallback>,
    ) {
        let topic = full_name(publisher, event);
        let mut steps = Vec::new();
        let mut buffered = Vec::new();
        let mut to_fetch = Vec::new();

        let (pruned, call) = {
            let mut tracers = self.inner.tracers.borrow_mut();
            let Some(tracer) = tracers.get_mut(&topic) else {
                trace!(topic = %topic, "publish without subscribers");
                return;
            };
            let mut state = self.inner.state.borrow_mut();
            let State {
                registry, pending, ..
            } = &mut *state;

            let pruned = tracer.prune(|id, events| !events.is_empty() && registry.contains(id));
            for (sub, events) in tracer.subscribers() {
                let Some(cmp) = registry.get(sub) else {
                    continue;
                };
                let st = cmp.state();
                if st.is_pending() {
                    for ev in events.iter().rev() {
                        pending.insert(sub, ev, publisher, event, &data);
                    }
                    buffered.push(sub.clone());
                    if st.can_fetch() {
                        to_fetch.push(sub.clone());
                    }
                    continue;
                }
                if st == ComponentState::Fetched {
                    steps.push(Step::Load(sub.clone()));
                }
                steps.extend(
                    events
                        .iter()
                        .rev()
                        .map(|ev| Step::Deliver(full_name(sub, ev))),
                );
            }

            let call = state.next_call();
            tracer.begin_call(call, callback);
            (pruned, call)
        };

        for id in pruned {
            trace!(component = %id, topic = %topic, "subscriber pruned");
            self.emit(
                Event::new(EventKind::SubscriberPruned)
                    .with_component(id)
                    .with_topic(topic.as_str()),
            );
        }
        for id in buffered {
            self.emit(
                Event::new(EventKind::DeliveryBuffered)
                    .with_component(id)
                    .with_topic(topic.as_str()),
            );
        }

        let mut recorder =
            CallRecorder::new(&self.inner.tracers, self.downgrade(), publisher, &topic, call);
        for step in steps {
            match step {
                Step::Load(id) => {
                    if let Err(err) = self.load(&id) {
                        debug!(component = %id, error = %err, "load before delivery skipped");
                    }
                }
                Step::Deliver(channel) => {
                    self.inner
                        .bus
                        .publish(&channel, &data, Some(&mut recorder));
                }
            }
        }
        self.seal(&topic, call);

        if !to_fetch.is_empty() {
            self.request_fetch(to_fetch);
        }
    }

    fn seal(&self, topic: &str, call: CallId) {
        let completion = self
            .inner
            .tracers
            .borrow_mut()
            .get_mut(topic)
            .and_then(|t| t.seal(call));
        if let Some(c) = completion {
            self.complete(c);
        }
    }

    fn complete(&self, completion: Completion) {
        debug!(topic = %completion.topic, call = %completion.call, "call completed");
        self.emit(
            Event::new(EventKind::CallCompleted)
                .with_topic(completion.topic.as_str())
                .with_count(completion.responders()),
        );
        completion.fire();
    }

    /// Routes a resume signal to its call.
    ///
    /// Errors mean the signal no longer matches an open call; handlers normally go through
    /// [`Invocation::resume`], which drops them.
    pub fn resume(&self, signal: &ResumeSignal, data: Value) -> Result<(), SignalError> {
        let completion = self.inner.tracers.borrow_mut().resolve(signal, data)?;
        if let Some(c) = completion {
            self.complete(c);
        }
        Ok(())
    }

    // ---- load ----

    /// Runs the factory of a `Fetched` component, then replays its buffered deliveries.
    pub fn load(&self, id: &str) -> Result<(), TransitionError> {
        let factory = {
            let mut state = self.inner.state.borrow_mut();
            let cmp = state
                .registry
                .get_mut(id)
                .ok_or_else(|| TransitionError::UnknownComponent { id: id.to_string() })?;
            cmp.transit(Transition::Load)?;
            cmp.factory()
        };

        if let Some(factory) = factory {
            factory(&ComponentHandle::new(id, self.downgrade()));
        }
        debug!(component = id, "component loaded");
        self.emit(Event::new(EventKind::ComponentLoaded).with_component(id));

        self.replay(id);
        Ok(())
    }

    fn replay(&self, id: &str) {
        let entries = self.inner.state.borrow_mut().pending.take(id);
        for (sub_event, deliveries) in entries {
            let channel = full_name(id, &sub_event);
            for d in deliveries.into_iter().rev() {
                let topic = full_name(&d.publisher, &d.event);
                let call = self.inner.state.borrow_mut().next_call();
                let known = match self.inner.tracers.borrow_mut().get_mut(&topic) {
                    Some(tracer) => {
                        tracer.begin_call(call, None);
                        true
                    }
                    None => false,
                };
                if !known {
                    trace!(component = id, topic = %topic, "buffered delivery dropped");
                    continue;
                }

                let mut recorder = CallRecorder::new(
                    &self.inner.tracers,
                    self.downgrade(),
                    &d.publisher,
                    &topic,
                    call,
                );
                self.inner
                    .bus
                    .publish(&channel, &d.data, Some(&mut recorder));
                self.seal(&topic, call);
                self.emit(
                    Event::new(EventKind::BufferReplayed)
                        .with_component(id)
                        .with_topic(topic.as_str()),
                );
            }
        }
    }

    // ---- host ----

    /// Host lifecycle entry point: runs a loader pass, then publishes `topic` from the
    /// environment component.
    pub fn host(&self, topic: HostTopic, data: Value) -> LoadReport {
        let report = self.tick();
        self.dispatch(ENV_ID, topic.as_str(), data, None);
        report
    }

    /// [`host`](Self::host) with a topic name (aliases accepted). Unknown names warn.
    pub fn host_named(&self, topic: &str, data: Value) -> Option<LoadReport> {
        match topic.parse::<HostTopic>() {
            Ok(t) => Some(self.host(t, data)),
            Err(err) => {
                self.warn(err, None);
                None
            }
        }
    }

    // ---- inspection ----

    pub fn state(&self, id: &str) -> Option<ComponentState> {
        self.inner.state.borrow().registry.get(id).map(Component::state)
    }

    pub fn options(&self, id: &str) -> Option<Value> {
        self.inner
            .state
            .borrow()
            .registry
            .get(id)
            .map(|c| c.options().clone())
    }

    pub fn context(&self, id: &str) -> Option<String> {
        self.inner
            .state
            .borrow()
            .registry
            .get(id)
            .and_then(|c| c.context().map(str::to_string))
    }

    /// Ids of the copies made from `id`.
    pub fn copies_of(&self, id: &str) -> Vec<String> {
        self.inner.state.borrow().registry.copies_of(id)
    }

    /// Every component id in creation order, the environment component included.
    pub fn component_ids(&self) -> Vec<String> {
        self.inner
            .state
            .borrow()
            .registry
            .ids()
            .map(str::to_string)
            .collect()
    }

    /// Number of deliveries buffered for `id`.
    pub fn pending_count(&self, id: &str) -> usize {
        self.inner.state.borrow().pending.count(id)
    }

    /// Subscriber graph of `publisher`'s `event`.
    pub fn subscribers_of(&self, publisher: &str, event: &str) -> Vec<(String, Vec<String>)> {
        self.inner
            .tracers
            .borrow()
            .get(&full_name(publisher, event))
            .map(|t| t.subscribers().to_vec())
            .unwrap_or_default()
    }

    /// Calls of `publisher`'s `event` still waiting for responses.
    pub fn open_calls(&self, publisher: &str, event: &str) -> usize {
        self.inner
            .tracers
            .borrow()
            .get(&full_name(publisher, event))
            .map_or(0, |t| t.open_calls())
    }

    /// Number of handlers registered on `id`'s `event`.
    pub fn handler_count(&self, id: &str, event: &str) -> usize {
        self.inner.bus.handler_count(&full_name(id, event))
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("Router")
            .field("components", &state.registry.len())
            .field("tracers", &self.inner.tracers.borrow().len())
            .field("channels", &self.inner.bus.channel_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observers::EventCollector;
    use serde_json::json;
    use std::cell::Cell;

    fn counting(router: &Router, id: &str, event: &str) -> Rc<Cell<usize>> {
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let event = event.to_string();
        router.define(id, None, move |cmp| {
            let h = Rc::clone(&h);
            cmp.out(&event, move |_, _| h.set(h.get() + 1));
        });
        hits
    }

    #[test]
    fn test_env_component_is_loaded() {
        let router = Router::new(Config::default());
        assert_eq!(router.state(ENV_ID), Some(ComponentState::Loaded));
        assert_eq!(router.tick(), LoadReport::default());
    }

    #[test]
    fn test_fetched_subscriber_loads_on_publish() {
        let router = Router::new(Config::default());
        let hits = counting(&router, "b", "y");
        router.subscribe("b", "a", &["x"], "y");

        router.publish("a", "x", json!(1));
        assert_eq!(router.state("b"), Some(ComponentState::Loaded));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_invalid_names_warn_and_noop() {
        let events = EventCollector::new();
        let router = Router::builder(Config::default())
            .with_observer(events.clone())
            .build();

        router.subscribe("b::c", "a", &["x"], "y");
        router.define("", None, |_| {});

        assert!(router.subscribers_of("a", "x").is_empty());
        assert_eq!(events.count(EventKind::ConfigWarning), 2);
    }

    #[test]
    fn test_event_list_is_rejected_by_on() {
        let events = EventCollector::new();
        let router = Router::builder(Config::default())
            .with_observer(events.clone())
            .build();
        let listed = Rc::new(Cell::new(None));
        let hits = Rc::new(Cell::new(0));
        let (l, h) = (Rc::clone(&listed), Rc::clone(&hits));
        router.define("panel", None, move |cmp| {
            l.set(Some(cmp.out("show,hide", |_, _| {}).is_some()));
            let h = Rc::clone(&h);
            cmp.out("hide", move |_, _| h.set(h.get() + 1));
        });
        router.subscribe("panel", "nav", &["close"], "hide");

        router.publish("nav", "close", Value::Null);
        assert_eq!(listed.get(), Some(false));
        assert_eq!(hits.get(), 1);
        assert_eq!(router.handler_count("panel", "show"), 0);
        assert_eq!(router.inner.bus.handler_count("hide"), 0);

        let warning = events.last(EventKind::ConfigWarning).unwrap();
        assert!(warning.reason.unwrap().contains("show,hide"));
    }

    #[test]
    fn test_redefine_loaded_only_merges_options() {
        let events = EventCollector::new();
        let router = Router::builder(Config::default())
            .with_observer(events.clone())
            .build();
        let runs = Rc::new(Cell::new(0));
        let r = Rc::clone(&runs);
        router.define("c", Some(json!({"a": 1})), move |_| r.set(r.get() + 1));
        router.load("c").unwrap();

        router.define("c", Some(json!({"b": 2})), |_| panic!("must not run"));
        assert_eq!(router.options("c"), Some(json!({"a": 1, "b": 2})));
        assert_eq!(runs.get(), 1);
        assert_eq!(
            events.last(EventKind::ConfigWarning).unwrap().reason.as_deref(),
            Some("already loaded: c")
        );
        assert!(router.load("c").is_err());
    }

    #[test]
    fn test_publish_prunes_unknown_subscriber() {
        let events = EventCollector::new();
        let router = Router::builder(Config::default())
            .with_observer(events.clone())
            .build();
        let hits = counting(&router, "b", "y");
        router.subscribe("b", "a", &["x"], "y");
        router
            .inner
            .tracers
            .borrow_mut()
            .get_or_create("a", "x")
            .add_subscriber("ghost", "y");

        router.publish("a", "x", json!(1));

        assert_eq!(hits.get(), 1);
        assert_eq!(
            router.subscribers_of("a", "x"),
            vec![("b".to_string(), vec!["y".to_string()])]
        );
        let pruned = events.last(EventKind::SubscriberPruned).unwrap();
        assert_eq!(pruned.component.as_deref(), Some("ghost"));
        assert_eq!(pruned.topic.as_deref(), Some("a_x"));
    }

    #[test]
    fn test_load_unknown_component() {
        let router = Router::new(Config::default());
        assert_eq!(
            router.load("ghost"),
            Err(TransitionError::UnknownComponent { id: "ghost".into() })
        );
    }

    #[test]
    fn test_hook_subscribes_env_once() {
        let router = Router::new(Config::default());
        let ready = Rc::new(Cell::new(0));
        let r = Rc::clone(&ready);
        router.define("w", None, move |cmp| {
            let r1 = Rc::clone(&r);
            cmp.hook("ready", move |_, _| r1.set(r1.get() + 1));
            let r2 = Rc::clone(&r);
            cmp.hook("ready", move |_, _| r2.set(r2.get() + 10));
            cmp.hook("blur", |_, _| {});
        });

        router.host(HostTopic::Ready, Value::Null);
        router.host(HostTopic::Ready, Value::Null);

        assert_eq!(ready.get(), 11);
        assert_eq!(
            router.subscribers_of(ENV_ID, "ready"),
            vec![("w".to_string(), vec!["ready".to_string()])]
        );
    }

    #[test]
    fn test_host_named_rejects_unknown() {
        let router = Router::new(Config::default());
        assert!(router.host_named("blur", Value::Null).is_none());
        assert!(router.host_named("onScroll", Value::Null).is_some());
    }

    #[test]
    fn test_debug_format() {
        let router = Router::new(Config::default());
        assert!(format!("{router:?}").contains("components: 1"));
    }
}
