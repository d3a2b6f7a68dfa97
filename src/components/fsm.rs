//! # Named-transition state machine.
//!
//! A small helper for component authors who model UI states (open/closed, idle/busy...).
//! Transitions are declared by name with their allowed source states, and optional hooks run
//! around the state change:
//!
//! ```text
//! transit("open", args) ──► check from ──► prev = state ──► before(args) ──► state = to ──► after(args)
//! ```
//!
//! ## Example
//! ```
//! use wcrouter::components::{FromState, Fsm};
//!
//! #[derive(Debug, Clone, Copy, PartialEq)]
//! enum Panel { Closed, Open }
//!
//! let mut fsm = Fsm::new();
//! fsm.init(Panel::Closed);
//! fsm.transition("open", FromState::One(Panel::Closed), Panel::Open);
//! fsm.transition("close", FromState::Any, Panel::Closed);
//!
//! fsm.transit("open", &[]).unwrap();
//! assert_eq!(fsm.state(), Some(Panel::Open));
//! assert!(fsm.transit("open", &[]).is_err());
//! ```

use std::collections::HashMap;
use std::fmt::Debug;
use std::rc::Rc;

use serde_json::Value;

use crate::error::TransitionError;

/// Hook run before or after a transition; receives the `transit` arguments.
pub type Hook = Rc<dyn Fn(&[Value])>;

/// Allowed source states of a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum FromState<S> {
    Any,
    One(S),
    Set(Vec<S>),
}

impl<S: PartialEq> FromState<S> {
    fn allows(&self, state: &S) -> bool {
        match self {
            FromState::Any => true,
            FromState::One(s) => s == state,
            FromState::Set(set) => set.contains(state),
        }
    }
}

struct Rule<S> {
    from: FromState<S>,
    to: S,
    before: Option<Hook>,
    after: Option<Hook>,
}

pub struct Fsm<S> {
    rules: HashMap<String, Rule<S>>,
    state: Option<S>,
    previous: Option<S>,
}

impl<S> Default for Fsm<S> {
    fn default() -> Self {
        Self {
            rules: HashMap::new(),
            state: None,
            previous: None,
        }
    }
}

impl<S: Copy + PartialEq + Debug> Fsm<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the current state and forgets the previous one.
    pub fn init(&mut self, state: S) -> &mut Self {
        self.previous = None;
        self.state = Some(state);
        self
    }

    /// Declares (or replaces) the transition `name`.
    pub fn transition(&mut self, name: &str, from: FromState<S>, to: S) -> &mut Self {
        self.rules.insert(
            name.to_string(),
            Rule {
                from,
                to,
                before: None,
                after: None,
            },
        );
        self
    }

    /// Attaches a hook run before the state changes. Ignored for undeclared transitions.
    pub fn before(&mut self, name: &str, hook: impl Fn(&[Value]) + 'static) -> &mut Self {
        if let Some(rule) = self.rules.get_mut(name) {
            rule.before = Some(Rc::new(hook));
        }
        self
    }

    /// Attaches a hook run after the state changed. Ignored for undeclared transitions.
    pub fn after(&mut self, name: &str, hook: impl Fn(&[Value]) + 'static) -> &mut Self {
        if let Some(rule) = self.rules.get_mut(name) {
            rule.after = Some(Rc::new(hook));
        }
        self
    }

    /// Performs transition `name`.
    pub fn transit(&mut self, name: &str, args: &[Value]) -> Result<(), TransitionError> {
        let state = self.state.ok_or(TransitionError::Uninitialized)?;
        let rule = self
            .rules
            .get(name)
            .ok_or_else(|| TransitionError::Undefined {
                name: name.to_string(),
            })?;
        if !rule.from.allows(&state) {
            return Err(TransitionError::Invalid {
                from: format!("{state:?}"),
                transition: name.to_string(),
            });
        }

        let (to, before, after) = (rule.to, rule.before.clone(), rule.after.clone());
        self.previous = Some(state);
        if let Some(hook) = before {
            hook(args);
        }
        self.state = Some(to);
        if let Some(hook) = after {
            hook(args);
        }
        Ok(())
    }

    pub fn state(&self) -> Option<S> {
        self.state
    }

    pub fn previous(&self) -> Option<S> {
        self.previous
    }
}
