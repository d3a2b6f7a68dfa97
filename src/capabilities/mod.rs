//! Host capabilities injected into a router at construction.
//!
//! The router never touches the page directly. Everything environment-specific arrives through
//! this set:
//!
//! | Capability | Trait | Absent means |
//! |---|---|---|
//! | code loading | [`Fetch`] | components are never fetched; only `define` makes them available |
//! | viewport test | [`Visibility`] | nothing is visible; the loader never fetches on its own |
//! | opaque helpers | `Rc<dyn Any>` under a whitelisted usage | [`ComponentHandle::capability`](crate::ComponentHandle::capability) returns `None` |

mod fetch;
mod visibility;

pub use fetch::{Asset, Fetch, FetchRequest};
pub use visibility::Visibility;

use std::any::Any;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::RouterError;

/// Usage names accepted by [`Capabilities::inject`].
pub const USAGES: [&str; 5] = ["dom", "template", "anim", "cache", "util"];

#[derive(Clone, Default)]
pub struct Capabilities {
    fetch: Option<Rc<dyn Fetch>>,
    visibility: Option<Rc<dyn Visibility>>,
    extensions: HashMap<String, Rc<dyn Any>>,
}

impl Capabilities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fetch(&mut self, fetch: Rc<dyn Fetch>) {
        self.fetch = Some(fetch);
    }

    pub fn set_visibility(&mut self, visibility: Rc<dyn Visibility>) {
        self.visibility = Some(visibility);
    }

    /// Registers an opaque helper under `usage` (replacing any previous one).
    pub fn inject(&mut self, usage: &str, value: Rc<dyn Any>) -> Result<(), RouterError> {
        if !USAGES.contains(&usage) {
            return Err(RouterError::UnknownCapability {
                usage: usage.to_string(),
            });
        }
        self.extensions.insert(usage.to_string(), value);
        Ok(())
    }

    pub fn get(&self, usage: &str) -> Option<Rc<dyn Any>> {
        self.extensions.get(usage).cloned()
    }

    pub fn fetch(&self) -> Option<Rc<dyn Fetch>> {
        self.fetch.clone()
    }

    pub fn can_fetch(&self) -> bool {
        self.fetch.is_some()
    }

    /// Asks the visibility oracle; `false` when there is none.
    pub fn is_visible(&self, context: &str, threshold: u32) -> bool {
        self.visibility
            .as_ref()
            .is_some_and(|v| v.is_visible(context, threshold))
    }
}
