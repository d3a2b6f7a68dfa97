//! # Code loading capability.
//!
//! The router describes what it needs as a [`FetchRequest`]; the host decides how to get it
//! (script injection, HTTP, a test table). A script request resolves to the component
//! [`Definition`]s the bundle provided.
//!
//! ```text
//! combo:    GET {js_root}{separator}a,b,c        (+ GET {css_root}{separator}a,b,c, result ignored)
//! per-id:   GET {root}a.js   GET {root}b.js   GET {root}c.js
//! ```

use async_trait::async_trait;

use crate::components::Definition;
use crate::error::FetchError;

/// Kind of resource requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Asset {
    Script,
    Style,
}

/// One resource to fetch, and the components it is expected to define.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub components: Vec<String>,
    pub asset: Asset,
}

/// Host-provided loader.
///
/// Futures run on the router's thread (driven by [`Router::settle`](crate::Router::settle)),
/// so implementations need not be `Send`.
#[async_trait(?Send)]
pub trait Fetch {
    /// Fetches `req`. For [`Asset::Style`] requests the returned definitions are ignored.
    async fn fetch(&self, req: &FetchRequest) -> Result<Vec<Definition>, FetchError>;
}
