//! # wcrouter
//!
//! **wcrouter** is the event core of a client-side component framework.
//!
//! Components declare publish/subscribe relationships to each other; the router binds a
//! publisher's named event to any number of subscriber components, defers delivery while a
//! subscriber's code is still being fetched, and lets a publisher collect its subscribers'
//! answers through resumable signals. Component code is loaded lazily, when its host
//! context becomes visible.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   ┌────────────┐    ┌────────────┐    ┌────────────┐
//!   │ component  │    │ component  │    │ component  │
//!   │  "filter"  │    │   "grid"   │    │  "pager"   │
//!   └─────┬──────┘    └─────┬──────┘    └─────┬──────┘
//!         │ publish         │ out/on          │ hook("ready")
//!         ▼                 ▼                 ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │ Router (one per page)                                        │
//! │  - Registry        components + state machine                │
//! │  - TracerCache     topic graph, open calls, resume signals   │
//! │  - PendingBuffer   deliveries waiting for a load             │
//! │  - EventBus        handlers by "{component}_{event}"         │
//! │  - Loader          visibility-driven fetch / load            │
//! └──────┬──────────────────────┬──────────────────────┬─────────┘
//!        ▼                      ▼                      ▼
//!   Fetch (host)          Visibility (host)      ObserverSet
//!   scripts → Definition  context in viewport?   LogWriter, custom...
//! ```
//!
//! ### Component lifecycle
//! ```text
//! Unfetched ──fetch──► Fetching ──define──► Fetched ──load──► Loaded
//!     ▲                   │                   ▲
//!     │                 fail                  │
//!     └──── fetch ──── Error ─────define──────┘
//! ```
//!
//! ### Response collection
//! ```text
//! grid.publish_with("query", data, cb)
//!   ├─► pager handler: inv.pause() ─► signal "grid::grid_query::7::pager_count::0"
//!   │         ... later ...        inv.resume(&signal, json!(42))
//!   └─► all slots filled ─► cb(vec![Response { subscriber: "pager_count", values: [42] }])
//! ```
//!
//! ## Features
//! | Area                | Description                                                  | Key types / traits                         |
//! |---------------------|--------------------------------------------------------------|--------------------------------------------|
//! | **Routing**         | Define, declare, subscribe, publish, resume.                 | [`Router`], [`Declaration`]                |
//! | **Components**      | Factories, handles, lifecycle states, helper FSM.            | [`ComponentHandle`], [`ComponentState`], [`Fsm`] |
//! | **Tracing**         | Per-call response collection with resumable signals.         | [`Invocation`], [`ResumeSignal`], [`Response`] |
//! | **Capabilities**    | Host-provided fetch, visibility and opaque helpers.          | [`Fetch`], [`Visibility`], [`Capabilities`] |
//! | **Observer API**    | Hook into router lifecycle events (logging, metrics).        | [`Observe`], [`LogWriter`], [`EventCollector`] |
//! | **Errors**          | Typed errors for setup, protocol, fetch and transitions.     | [`RouterError`], [`SignalError`], [`FetchError`], [`TransitionError`] |
//! | **Configuration**   | Router settings and whole-page declarations (TOML / JSON).   | [`Config`], [`PageConfig`]                 |
//!
//! ## Example
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use serde_json::json;
//! use wcrouter::{Config, Router};
//!
//! let router = Router::new(Config::default());
//! let seen = Rc::new(RefCell::new(Vec::new()));
//!
//! let sink = Rc::clone(&seen);
//! router.define("grid", None, move |cmp| {
//!     let sink = Rc::clone(&sink);
//!     cmp.out("reload", move |_inv, args| sink.borrow_mut().push(args[0].clone()));
//! });
//! router.subscribe("grid", "filter", &["changed"], "reload");
//!
//! // "grid" is defined but not loaded: publishing loads it, then delivers.
//! router.publish("filter", "changed", json!({"q": "rust"}));
//! assert_eq!(*seen.borrow(), vec![json!({"q": "rust"})]);
//! ```

pub mod bus;
pub mod capabilities;
pub mod components;
mod core;
mod error;
pub mod events;
pub mod observers;
pub mod pending;
pub mod tracer;

// ---- Public re-exports ----

pub use bus::{EventBus, HandlerId};
pub use capabilities::{Asset, Capabilities, Fetch, FetchRequest, Visibility};
pub use components::{
    Component, ComponentHandle, ComponentState, Declaration, Definition, Factory, FromState, Fsm,
    HostTopic, Transition, ENV_ID,
};
pub use crate::core::{
    ComboConfig, ComponentDecl, Config, LoadReport, PageConfig, PageError, Router, RouterBuilder,
    SubscriptionDecl, UsageDecl,
};
pub use error::{FetchError, RouterError, SignalError, TransitionError};
pub use events::{Event, EventKind};
pub use observers::{EventCollector, LogWriter, Observe, ObserverSet};
pub use tracer::{CallId, Invocation, Response, ResumeSignal, SIGNAL_SEPARATOR};
