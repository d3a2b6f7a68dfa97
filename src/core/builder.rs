use std::any::Any;
use std::rc::Rc;

use crate::capabilities::{Capabilities, Fetch, Visibility};
use crate::error::RouterError;
use crate::observers::{Observe, ObserverSet};

use super::{config::Config, router::Router};

/// Builder for constructing a [`Router`] with capabilities and observers.
///
/// # Example
/// ```
/// use wcrouter::{Config, LogWriter, Router};
///
/// let router = Router::builder(Config::default())
///     .with_visibility(|_ctx: &str, _threshold: u32| true)
///     .inject("util", 42u32)
///     .with_observer(LogWriter::new())
///     .build();
/// assert!(router.capability("util").is_some());
/// ```
pub struct RouterBuilder {
    cfg: Config,
    caps: Capabilities,
    observers: Vec<Rc<dyn Observe>>,
    warnings: Vec<RouterError>,
}

impl RouterBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            caps: Capabilities::new(),
            observers: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Sets the code loader. Without one, components only become available through `define`.
    pub fn with_fetch(mut self, fetch: impl Fetch + 'static) -> Self {
        self.caps.set_fetch(Rc::new(fetch));
        self
    }

    /// Sets the viewport oracle used by the loader.
    pub fn with_visibility(mut self, visibility: impl Visibility + 'static) -> Self {
        self.caps.set_visibility(Rc::new(visibility));
        self
    }

    /// Injects an opaque helper under a whitelisted usage.
    ///
    /// Unknown usages are reported as configuration warnings once the router is built.
    pub fn inject<T: Any>(mut self, usage: &str, value: T) -> Self {
        if let Err(err) = self.caps.inject(usage, Rc::new(value)) {
            self.warnings.push(err);
        }
        self
    }

    /// Adds one observer.
    pub fn with_observer(mut self, observer: impl Observe + 'static) -> Self {
        self.observers.push(Rc::new(observer));
        self
    }

    /// Sets the observers (replacing any added before).
    pub fn with_observers(mut self, observers: Vec<Rc<dyn Observe>>) -> Self {
        self.observers = observers;
        self
    }

    /// Builds the router.
    pub fn build(self) -> Router {
        let router = Router::from_parts(self.cfg, self.caps, ObserverSet::new(self.observers));
        for err in self.warnings {
            router.warn(err, None);
        }
        router
    }
}
