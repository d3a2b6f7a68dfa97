//! # Pending-delivery buffer.
//!
//! Holds deliveries for subscribers whose code is not loaded yet. Layout:
//!
//! ```text
//! subscriber ─► [ (sub_event, [ {publisher, event, data}, ... ]), ... ]
//!                  insertion order     at most one entry per (publisher, event)
//! ```
//!
//! A repeated publish of the same topic before the subscriber loads overwrites the data of the
//! existing entry, so the subscriber sees only the latest value, once.

use std::collections::HashMap;

use serde_json::Value;

/// One buffered delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingDelivery {
    pub publisher: String,
    pub event: String,
    pub data: Value,
}

/// Buffered deliveries of one subscriber, grouped by subscriber event.
pub type PendingEntries = Vec<(String, Vec<PendingDelivery>)>;

#[derive(Debug, Default)]
pub struct PendingBuffer {
    entries: HashMap<String, PendingEntries>,
}

impl PendingBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffers `data` from `publisher`'s `event` for `subscriber`'s `sub_event`.
    ///
    /// Returns `true` if a new entry was appended, `false` if an existing one was overwritten.
    pub fn insert(
        &mut self,
        subscriber: &str,
        sub_event: &str,
        publisher: &str,
        event: &str,
        data: &Value,
    ) -> bool {
        let groups = self.entries.entry(subscriber.to_string()).or_default();
        let list = match groups.iter().position(|(e, _)| e == sub_event) {
            Some(i) => &mut groups[i].1,
            None => {
                groups.push((sub_event.to_string(), Vec::new()));
                let last = groups.len() - 1;
                &mut groups[last].1
            }
        };

        if let Some(existing) = list
            .iter_mut()
            .rev()
            .find(|d| d.publisher == publisher && d.event == event)
        {
            existing.data = data.clone();
            return false;
        }
        list.push(PendingDelivery {
            publisher: publisher.to_string(),
            event: event.to_string(),
            data: data.clone(),
        });
        true
    }

    /// Removes and returns everything buffered for `subscriber`.
    pub fn take(&mut self, subscriber: &str) -> PendingEntries {
        self.entries.remove(subscriber).unwrap_or_default()
    }

    /// Number of buffered deliveries for `subscriber`.
    pub fn count(&self, subscriber: &str) -> usize {
        self.entries
            .get(subscriber)
            .map_or(0, |g| g.iter().map(|(_, l)| l.len()).sum())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
