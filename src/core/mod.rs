//! Router core: the page context object and everything it drives.
//!
//! The only entry point is [`Router`]; the rest of this module supports it.
//!
//! Internal modules:
//! - [`router`]: registry, topic graph, publish/deliver/resume, load and replay;
//! - [`loader`]: visibility-driven loader pass (`tick`);
//! - [`fetch`]: fetch requests and their completion (`settle`);
//! - [`builder`]: capabilities and observers wiring;
//! - [`registry`]: component records in creation order;
//! - [`config`], [`page`]: router settings and page declarations (TOML / JSON).

mod builder;
mod config;
mod fetch;
mod loader;
mod page;
mod registry;
mod router;

pub use builder::RouterBuilder;
pub use config::{ComboConfig, Config, DEFAULT_COMBO_SEPARATOR};
pub use loader::LoadReport;
pub use page::{ComponentDecl, PageConfig, PageError, SubscriptionDecl, UsageDecl};
pub use router::Router;
pub(crate) use router::WeakRouter;
