//! # Event observers for the router.
//!
//! This module provides the [`Observe`] trait and built-in implementations for handling
//! runtime [`Event`](crate::Event)s emitted by the [`Router`](crate::Router).
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   Router ── emit(Event) ──► ObserverSet ──► Observe::on_event(&Event)
//!                                                  │
//!                                     ┌────────────┼─────────────┐
//!                                     ▼            ▼             ▼
//!                                 LogWriter  EventCollector   Custom ...
//! ```
//!
//! ## Observer types
//! - **Passive observers**: react to events (logging, metrics)
//! - **Stateful observers**: keep state built from events ([`EventCollector`])

mod collector;
mod log;
mod observer;
mod set;

pub use collector::EventCollector;
pub use log::LogWriter;
pub use observer::Observe;
pub use set::ObserverSet;
