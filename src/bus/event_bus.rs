//! # Event bus for named-channel fan-out.
//!
//! [`EventBus`] maps channel names to ordered handler lists. It is the delivery layer of the
//! router but is usable on its own (with any `Default` invocation context).
//!
//! ## Rules
//! - **Snapshot dispatch**: the handler list is copied before iteration, so handlers may
//!   subscribe/unsubscribe during a dispatch without affecting it.
//! - **Reverse order**: the last registered handler runs first. Handler indices refer to
//!   snapshot positions and are what resume signals carry, so this order is part of the contract.
//! - **Once**: a once-handler runs at most one time, even if its channel is published again
//!   from inside its own dispatch.
//! - **Missing channel**: publishing to a channel nobody registered is a silent no-op.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value;

use super::handler::{Handler, HandlerId, Registration};

/// Separates channel names in the `names` argument of [`EventBus::subscribe`].
pub const CHANNEL_LIST_SEPARATOR: char = ',';

/// Observer of a single dispatch.
///
/// The tracer implements this to learn which channel is being delivered, how many handlers it
/// has, and which handler index is about to run; it returns the context handed to that handler.
pub trait Recorder<C> {
    /// Called once per channel, before its first handler runs.
    fn sub(&mut self, channel: &str, handler_count: usize);

    /// Called before each handler invocation; returns the context passed to the handler.
    fn handler_index(&mut self, index: usize) -> C;

    /// Called instead of [`handler_index`](Recorder::handler_index) for a snapshot handler that
    /// will not run (a once-handler already consumed by a nested dispatch).
    fn skip(&mut self, _index: usize) {}
}

/// Normalizes a payload into an argument list.
///
/// Arrays become their elements; any other value becomes a one-item list.
///
/// # Example
/// ```
/// use serde_json::json;
/// use wcrouter::bus::into_args;
///
/// assert_eq!(into_args(&json!([1, 2])), vec![json!(1), json!(2)]);
/// assert_eq!(into_args(&json!("x")), vec![json!("x")]);
/// ```
pub fn into_args(data: &Value) -> Vec<Value> {
    match data {
        Value::Array(items) => items.clone(),
        other => vec![other.clone()],
    }
}

/// Named-channel publish/subscribe bus.
///
/// Interior mutability keeps every method on `&self`, which is what lets handlers re-enter
/// the bus while a dispatch is running.
pub struct EventBus<C> {
    channels: RefCell<HashMap<String, Vec<Registration<C>>>>,
    next_id: Cell<u64>,
}

impl<C> Default for EventBus<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> EventBus<C> {
    /// Creates an empty bus.
    pub fn new() -> Self {
        Self {
            channels: RefCell::new(HashMap::new()),
            next_id: Cell::new(1),
        }
    }

    /// Registers `handler` under each name of the comma-separated `names`.
    ///
    /// Returns `None` (and registers nothing) when `names` holds no usable name.
    /// With `once`, the handler is removed from every channel on its first invocation.
    pub fn subscribe(&self, names: &str, handler: Handler<C>, once: bool) -> Option<HandlerId> {
        let names: Vec<&str> = names
            .split(CHANNEL_LIST_SEPARATOR)
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .collect();
        if names.is_empty() {
            return None;
        }

        let id = HandlerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        let fired = once.then(|| Rc::new(Cell::new(false)));

        let mut channels = self.channels.borrow_mut();
        for name in names {
            channels
                .entry(name.to_string())
                .or_default()
                .push(Registration {
                    id,
                    handler: Rc::clone(&handler),
                    fired: fired.clone(),
                });
        }
        Some(id)
    }

    /// Removes registrations.
    ///
    /// | `name` | `handler` | effect |
    /// |--------|-----------|--------|
    /// | `None` | `None` | clear every channel |
    /// | `Some` | `None` | drop the channel |
    /// | `Some` | `Some` | drop that registration from the channel |
    /// | `None` | `Some` | drop that registration from every channel |
    pub fn unsubscribe(&self, name: Option<&str>, handler: Option<HandlerId>) {
        let mut channels = self.channels.borrow_mut();
        match (name, handler) {
            (None, None) => channels.clear(),
            (Some(name), None) => {
                channels.remove(name);
            }
            (Some(name), Some(id)) => {
                if let Some(list) = channels.get_mut(name) {
                    list.retain(|r| r.id != id);
                    if list.is_empty() {
                        channels.remove(name);
                    }
                }
            }
            (None, Some(id)) => {
                channels.retain(|_, list| {
                    list.retain(|r| r.id != id);
                    !list.is_empty()
                });
            }
        }
    }

    /// Number of handlers currently registered on `name`.
    pub fn handler_count(&self, name: &str) -> usize {
        self.channels.borrow().get(name).map_or(0, Vec::len)
    }

    /// Number of channels with at least one handler.
    pub fn channel_count(&self) -> usize {
        self.channels.borrow().len()
    }

    /// True if no channel has handlers.
    pub fn is_empty(&self) -> bool {
        self.channels.borrow().is_empty()
    }

    fn remove_everywhere(&self, id: HandlerId) {
        self.unsubscribe(None, Some(id));
    }
}

impl<C: Default> EventBus<C> {
    /// Publishes `data` on a single channel. Returns the number of handlers invoked.
    pub fn publish(
        &self,
        name: &str,
        data: &Value,
        recorder: Option<&mut dyn Recorder<C>>,
    ) -> usize {
        self.publish_all(&[name], data, recorder)
    }

    /// Publishes `data` on each channel of `names`, in order.
    ///
    /// Without a recorder, handlers receive `C::default()` as their context.
    pub fn publish_all(
        &self,
        names: &[&str],
        data: &Value,
        mut recorder: Option<&mut dyn Recorder<C>>,
    ) -> usize {
        let args = into_args(data);
        let mut invoked = 0;

        for name in names {
            let snapshot: Vec<Registration<C>> = match self.channels.borrow().get(*name) {
                Some(list) if !list.is_empty() => list.clone(),
                _ => continue,
            };

            if let Some(rec) = recorder.as_deref_mut() {
                rec.sub(name, snapshot.len());
            }

            for (index, reg) in snapshot.iter().enumerate().rev() {
                if let Some(fired) = &reg.fired {
                    if fired.replace(true) {
                        if let Some(rec) = recorder.as_deref_mut() {
                            rec.skip(index);
                        }
                        continue;
                    }
                    self.remove_everywhere(reg.id);
                }
                let ctx = match recorder.as_deref_mut() {
                    Some(rec) => rec.handler_index(index),
                    None => C::default(),
                };
                (reg.handler)(&ctx, &args);
                invoked += 1;
            }
        }
        invoked
    }
}
