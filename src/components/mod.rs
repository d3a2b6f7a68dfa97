//! Components: identity, lifecycle state, definitions and the handle factories receive.
//!
//! ## Contents
//! - [`Component`], [`ComponentState`], [`Transition`] registry record and its state table
//! - [`Definition`], [`Factory`] what `define` (or a fetched bundle) provides
//! - [`ComponentHandle`] the factory's view of its component (`on`/`hook`/`publish`)
//! - [`Declaration`] page-level wiring of contexts, copies and subscriptions
//! - [`HostTopic`] lifecycle topics published by the host page
//! - [`Fsm`] small named-transition state machine for component authors
//!
//! ## Naming
//! A topic is addressed by its full name `"{component}_{event}"`. Component ids and event
//! names must not contain [`SIGNAL_SEPARATOR`](crate::SIGNAL_SEPARATOR) or the bus channel
//! list separator `,`.

mod component;
mod declaration;
mod fsm;
mod handle;
mod host;
mod state;

pub use component::{merge_options, Component, Definition, Factory};
pub use declaration::Declaration;
pub use fsm::{FromState, Fsm, Hook};
pub use handle::ComponentHandle;
pub use host::HostTopic;
pub use state::{ComponentState, Transition};

use crate::bus::CHANNEL_LIST_SEPARATOR;
use crate::error::RouterError;
use crate::tracer::SIGNAL_SEPARATOR;

/// Id of the reserved component that publishes host lifecycle topics.
pub const ENV_ID: &str = "__env__";

/// Separator between component id and event name in a full event name.
pub const FULL_NAME_SEPARATOR: &str = "_";

/// Builds the full event name of `event` on component `id`.
///
/// The mapping is not injective: ids and events may themselves contain `_`, so component
/// `a_b` with event `c` and component `a` with event `b_c` share the name `a_b_c` (and with it
/// the bus channel and tracer). Pick ids and event names that cannot collide this way.
///
/// # Example
/// ```
/// assert_eq!(wcrouter::components::full_name("nav", "open"), "nav_open");
/// ```
pub fn full_name(id: &str, event: &str) -> String {
    format!("{id}{FULL_NAME_SEPARATOR}{event}")
}

/// Checks that `name` is usable as a component id or event name.
pub(crate) fn validate_name(name: &str) -> Result<(), RouterError> {
    if name.is_empty() {
        return Err(RouterError::MissingId);
    }
    if name.contains(SIGNAL_SEPARATOR) {
        return Err(RouterError::InvalidName {
            name: name.to_string(),
            separator: SIGNAL_SEPARATOR,
        });
    }
    if name.contains(CHANNEL_LIST_SEPARATOR) {
        return Err(RouterError::InvalidName {
            name: name.to_string(),
            separator: ",",
        });
    }
    Ok(())
}
