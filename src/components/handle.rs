//! # ComponentHandle: the factory's view of its component.
//!
//! A factory receives a handle bound to its component id. Through it the component declares
//! the events it answers (`out`/`on`), reacts to host lifecycle topics (`hook`), and publishes
//! its own events.
//!
//! ```text
//! router.define("panel", None, |cmp| {
//!     cmp.out("show", |inv, args| { ... inv.pause() ... });   // channel "panel_show"
//!     cmp.hook("ready", |_, _| { ... });                        // once, via __env__
//!     cmp.publish("mounted", json!(null));                      // topic "panel_mounted"
//! });
//! ```
//!
//! The handle holds a weak router reference; after the router is dropped every operation is a
//! no-op.

use std::any::Any;
use std::rc::Rc;

use serde_json::Value;

use crate::bus::HandlerId;
use crate::core::{Router, WeakRouter};
use crate::tracer::{Invocation, Response};

#[derive(Clone)]
pub struct ComponentHandle {
    id: String,
    router: WeakRouter,
}

impl ComponentHandle {
    pub(crate) fn new(id: impl Into<String>, router: WeakRouter) -> Self {
        Self {
            id: id.into(),
            router,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current options of the component (`Null` if none were given).
    pub fn options(&self) -> Value {
        self.router
            .upgrade()
            .and_then(|r| r.options(&self.id))
            .unwrap_or_default()
    }

    /// Host-page context the component is anchored to.
    pub fn context(&self) -> Option<String> {
        self.router.upgrade().and_then(|r| r.context(&self.id))
    }

    /// Declares an event this component answers.
    pub fn out(
        &self,
        event: &str,
        handler: impl Fn(&Invocation, &[Value]) + 'static,
    ) -> Option<HandlerId> {
        self.router
            .upgrade()?
            .on(&self.id, event, Rc::new(handler), false)
    }

    /// Alias of [`out`](Self::out).
    pub fn on(
        &self,
        event: &str,
        handler: impl Fn(&Invocation, &[Value]) + 'static,
    ) -> Option<HandlerId> {
        self.out(event, handler)
    }

    /// Like [`out`](Self::out) but the handler runs at most once.
    pub fn once(
        &self,
        event: &str,
        handler: impl Fn(&Invocation, &[Value]) + 'static,
    ) -> Option<HandlerId> {
        self.router
            .upgrade()?
            .on(&self.id, event, Rc::new(handler), true)
    }

    /// Removes a handler (or every handler with `None`) from one of this component's events.
    pub fn off(&self, event: &str, handler: Option<HandlerId>) {
        if let Some(router) = self.router.upgrade() {
            router.off(&self.id, event, handler);
        }
    }

    /// Reacts to a host lifecycle topic (`ready`, `loaded`, `scroll`, `resize`, `beforeLeave`).
    ///
    /// Unknown topics are reported as configuration warnings and ignored.
    pub fn hook(
        &self,
        topic: &str,
        handler: impl Fn(&Invocation, &[Value]) + 'static,
    ) -> Option<HandlerId> {
        self.router
            .upgrade()?
            .hook(&self.id, topic, Rc::new(handler))
    }

    /// Publishes `event` of this component.
    pub fn publish(&self, event: &str, data: Value) {
        if let Some(router) = self.router.upgrade() {
            router.publish(&self.id, event, data);
        }
    }

    /// Publishes `event` and collects responses from subscribers that resume.
    pub fn publish_with(
        &self,
        event: &str,
        data: Value,
        callback: impl FnOnce(Vec<Response>) + 'static,
    ) {
        if let Some(router) = self.router.upgrade() {
            router.publish_with(&self.id, event, data, callback);
        }
    }

    /// Injected capability registered under `usage`, if it has type `T`.
    pub fn capability<T: Any>(&self, usage: &str) -> Option<Rc<T>> {
        self.router
            .upgrade()?
            .capability(usage)?
            .downcast::<T>()
            .ok()
    }

    pub fn router(&self) -> Option<Router> {
        self.router.upgrade()
    }
}

impl std::fmt::Debug for ComponentHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentHandle").field("id", &self.id).finish()
    }
}
