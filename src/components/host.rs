use std::fmt;
use std::str::FromStr;

use crate::error::RouterError;

/// Host page lifecycle topic, published by the reserved environment component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostTopic {
    Ready,
    Loaded,
    Scroll,
    Resize,
    BeforeLeave,
}

impl HostTopic {
    pub const ALL: [HostTopic; 5] = [
        HostTopic::Ready,
        HostTopic::Loaded,
        HostTopic::Scroll,
        HostTopic::Resize,
        HostTopic::BeforeLeave,
    ];

    /// Canonical topic name used on the bus.
    pub fn as_str(self) -> &'static str {
        match self {
            HostTopic::Ready => "ready",
            HostTopic::Loaded => "loaded",
            HostTopic::Scroll => "scroll",
            HostTopic::Resize => "resize",
            HostTopic::BeforeLeave => "beforeLeave",
        }
    }

    /// Topics that fire once per page; hooks on them are once-handlers.
    pub fn is_once(self) -> bool {
        matches!(self, HostTopic::Ready | HostTopic::Loaded)
    }
}

impl fmt::Display for HostTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HostTopic {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ready" => Ok(HostTopic::Ready),
            "loaded" | "load" | "onLoad" => Ok(HostTopic::Loaded),
            "scroll" | "onScroll" => Ok(HostTopic::Scroll),
            "resize" | "onResize" => Ok(HostTopic::Resize),
            "beforeLeave" => Ok(HostTopic::BeforeLeave),
            other => Err(RouterError::UnknownHostTopic {
                topic: other.to_string(),
            }),
        }
    }
}
