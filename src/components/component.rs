use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::error::TransitionError;

use super::handle::ComponentHandle;
use super::state::{ComponentState, Transition};

/// Component factory. Runs once, when the component loads.
pub type Factory = Rc<dyn Fn(&ComponentHandle)>;

/// Registry record of one component.
pub struct Component {
    id: String,
    state: ComponentState,
    options: Value,
    factory: Option<Factory>,
    context: Option<String>,
    origin: Option<String>,
}

impl Component {
    pub(crate) fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state: ComponentState::Unfetched,
            options: Value::Null,
            factory: None,
            context: None,
            origin: None,
        }
    }

    /// The reserved environment component: loaded from the start, no factory.
    pub(crate) fn environment() -> Self {
        let mut env = Self::new(super::ENV_ID);
        env.state = ComponentState::Loaded;
        env
    }

    /// A copy of `origin` placed in another host context.
    pub(crate) fn copy_of(id: impl Into<String>, origin: &Component, context: &str) -> Self {
        let mut copy = Self::new(id);
        copy.options = origin.options.clone();
        copy.origin = Some(origin.id.clone());
        copy.context = Some(context.to_string());
        if let Some(f) = &origin.factory {
            copy.factory = Some(Rc::clone(f));
            copy.state = ComponentState::Fetched;
        }
        copy
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> ComponentState {
        self.state
    }

    pub fn options(&self) -> &Value {
        &self.options
    }

    /// Opaque host-page anchor handed to the visibility oracle.
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Id of the component this one was copied from.
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    pub fn is_defined(&self) -> bool {
        self.factory.is_some()
    }

    pub(crate) fn factory(&self) -> Option<Factory> {
        self.factory.clone()
    }

    pub(crate) fn set_context(&mut self, context: &str) {
        self.context = Some(context.to_string());
    }

    pub(crate) fn merge_options(&mut self, overlay: &Value) {
        merge_options(&mut self.options, overlay);
    }

    /// Installs `factory` and moves to `Fetched`.
    pub(crate) fn define(&mut self, factory: Factory) -> Result<(), TransitionError> {
        self.transit(Transition::Define)?;
        self.factory = Some(factory);
        Ok(())
    }

    pub(crate) fn transit(&mut self, t: Transition) -> Result<ComponentState, TransitionError> {
        self.state = self.state.apply(t)?;
        Ok(self.state)
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("options", &self.options)
            .field("defined", &self.factory.is_some())
            .field("context", &self.context)
            .field("origin", &self.origin)
            .finish()
    }
}

/// Code for one component, as provided by `define` or by a fetched bundle.
#[derive(Clone)]
pub struct Definition {
    pub id: String,
    pub options: Option<Value>,
    pub factory: Factory,
}

impl Definition {
    pub fn new(id: impl Into<String>, factory: impl Fn(&ComponentHandle) + 'static) -> Self {
        Self {
            id: id.into(),
            options: None,
            factory: Rc::new(factory),
        }
    }

    pub fn with_options(mut self, options: Value) -> Self {
        self.options = Some(options);
        self
    }
}

impl fmt::Debug for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Definition")
            .field("id", &self.id)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Shallow-merges `overlay` into `base`.
///
/// Object keys of the overlay replace keys of the base; a non-object overlay replaces the
/// base; `null` is ignored.
///
/// # Example
/// ```
/// use serde_json::json;
/// use wcrouter::components::merge_options;
///
/// let mut base = json!({"a": 1, "b": {"x": 1}});
/// merge_options(&mut base, &json!({"b": {"y": 2}, "c": 3}));
/// assert_eq!(base, json!({"a": 1, "b": {"y": 2}, "c": 3}));
/// ```
pub fn merge_options(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (_, Value::Null) => {}
        (Value::Object(b), Value::Object(o)) => {
            for (k, v) in o {
                b.insert(k.clone(), v.clone());
            }
        }
        (b, o) => *b = o.clone(),
    }
}
