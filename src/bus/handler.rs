use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

/// Shared handler: receives the invocation context and the normalized argument list.
pub type Handler<C> = Rc<dyn Fn(&C, &[Value])>;

/// Identity of one `subscribe` call.
///
/// A handler subscribed under several channels shares one id across all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(pub(crate) u64);

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "h{}", self.0)
    }
}

/// One handler registered on one channel.
pub(crate) struct Registration<C> {
    pub id: HandlerId,
    pub handler: Handler<C>,
    /// Present for once-handlers; shared by every channel the handler was registered on.
    pub fired: Option<Rc<Cell<bool>>>,
}

impl<C> Clone for Registration<C> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            handler: Rc::clone(&self.handler),
            fired: self.fired.clone(),
        }
    }
}
