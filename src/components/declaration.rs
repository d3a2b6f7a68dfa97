use serde_json::Value;

use crate::core::Router;

/// Page-level wiring of one component: where it sits, its options, what it subscribes to.
///
/// Obtained from [`Router::declare`]. Every call marks the loader dirty so the next
/// [`tick`](Router::tick) rescans the page.
///
/// # Example
/// ```
/// use serde_json::json;
/// use wcrouter::{Config, Router};
///
/// let router = Router::new(Config::default());
/// router
///     .declare("grid")
///     .options(json!({"rows": 10}))
///     .contexts(&["#left", "#right"], None)
///     .subscribe("filter", &["changed"], "reload");
///
/// assert_eq!(router.context("grid").as_deref(), Some("#right"));
/// assert_eq!(router.copies_of("grid"), vec!["grid_v0".to_string()]);
/// assert_eq!(router.subscribers_of("filter", "changed").len(), 2);
/// ```
pub struct Declaration {
    router: Router,
    id: String,
}

impl Declaration {
    pub(crate) fn new(router: Router, id: impl Into<String>) -> Self {
        Self {
            router,
            id: id.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Anchors the component to one host context.
    pub fn context(self, context: &str) -> Self {
        self.router.set_context(&self.id, context);
        self
    }

    /// Shallow-merges `options` into the component's options.
    pub fn options(self, options: Value) -> Self {
        self.router.merge_options(&self.id, &options);
        self
    }

    /// Places the component in several host contexts.
    ///
    /// The last context is the component's own; each other one gets a copy `"{id}_v{n}"` that
    /// shares options and, once defined, the factory.
    pub fn contexts(self, contexts: &[&str], options: Option<Value>) -> Self {
        let Some((own, others)) = contexts.split_last() else {
            return self;
        };
        if let Some(options) = &options {
            self.router.merge_options(&self.id, options);
        }
        for ctx in others {
            self.router.add_copy(&self.id, ctx, None);
        }
        self.router.set_context(&self.id, own);
        self
    }

    /// Adds one usage of the component.
    ///
    /// The first usage anchors the component itself; a usage in the same context merges its
    /// options; a usage in another context creates a copy with its own options.
    pub fn usage(self, context: &str, options: Option<Value>) -> Self {
        match self.router.context(&self.id) {
            None => {
                self.router.set_context(&self.id, context);
                if let Some(options) = &options {
                    self.router.merge_options(&self.id, options);
                }
            }
            Some(current) if current == context => {
                if let Some(options) = &options {
                    self.router.merge_options(&self.id, options);
                }
            }
            Some(_) => {
                self.router.add_copy(&self.id, context, options.as_ref());
            }
        }
        self
    }

    /// Subscribes the component, and every copy of it, to `publisher`'s `events`.
    ///
    /// Deliveries arrive on the component's `receiver` event.
    pub fn subscribe(self, publisher: &str, events: &[&str], receiver: &str) -> Self {
        self.router.subscribe(&self.id, publisher, events, receiver);
        for copy in self.router.copies_of(&self.id) {
            self.router.subscribe(&copy, publisher, events, receiver);
        }
        self
    }
}
