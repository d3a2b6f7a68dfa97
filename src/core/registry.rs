//! # Component registry.
//!
//! Owns every [`Component`] record of a router, in creation order.
//!
//! ## Rules
//! - Records are created on first reference and never removed.
//! - Iteration order (`ids`) is creation order; the loader scans in this order.
//! - Copies remember their origin; `copies_of` lists them in creation order.

use std::collections::HashMap;

use crate::components::Component;

#[derive(Default)]
pub struct Registry {
    components: HashMap<String, Component>,
    order: Vec<String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&Component> {
        self.components.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Component> {
        self.components.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.components.contains_key(id)
    }

    /// Returns the record of `id`, creating it if needed. The flag is `true` on creation.
    pub fn ensure(&mut self, id: &str) -> (&mut Component, bool) {
        let created = !self.components.contains_key(id);
        if created {
            self.order.push(id.to_string());
        }
        let cmp = self
            .components
            .entry(id.to_string())
            .or_insert_with(|| Component::new(id));
        (cmp, created)
    }

    /// Inserts a new record. Returns `false` (and keeps the existing one) if the id is taken.
    pub fn insert(&mut self, cmp: Component) -> bool {
        if self.components.contains_key(cmp.id()) {
            return false;
        }
        self.order.push(cmp.id().to_string());
        self.components.insert(cmp.id().to_string(), cmp);
        true
    }

    /// Ids in creation order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Ids of the copies made from `origin`, in creation order.
    pub fn copies_of(&self, origin: &str) -> Vec<String> {
        self.order
            .iter()
            .filter(|id| {
                self.components
                    .get(id.as_str())
                    .is_some_and(|c| c.origin() == Some(origin))
            })
            .cloned()
            .collect()
    }

    /// First free copy id of `origin`: `"{origin}_v{n}"`.
    pub fn next_copy_id(&self, origin: &str) -> String {
        (0..)
            .map(|n| format!("{origin}_v{n}"))
            .find(|id| !self.components.contains_key(id))
            .unwrap_or_else(|| format!("{origin}_v{}", self.order.len()))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
