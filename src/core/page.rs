//! # Page declarations.
//!
//! A [`PageConfig`] describes a whole page: router settings plus every component's options,
//! placement and subscriptions. It is loaded from TOML or JSON and applied with
//! [`Router::configure`](crate::Router::configure).
//!
//! ```toml
//! [router]
//! root = "/cmps/"
//!
//! [[components]]
//! id = "grid"
//! options = { rows = 10 }
//! usage = [{ context = "#left" }, { context = "#right", options = { rows = 5 } }]
//!
//! [[components.subscriptions]]
//! publisher = "filter"
//! events = ["changed"]
//! receiver = "reload"
//! ```

use serde::Deserialize;
use serde_json::Value;

use super::config::Config;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub router: Config,
    pub components: Vec<ComponentDecl>,
}

/// Declaration of one component.
///
/// With neither `context` nor `usage`, the component is anchored to `"#{id}"`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ComponentDecl {
    pub id: String,
    #[serde(default)]
    pub options: Option<Value>,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub usage: Vec<UsageDecl>,
    #[serde(default)]
    pub subscriptions: Vec<SubscriptionDecl>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct UsageDecl {
    pub context: String,
    #[serde(default)]
    pub options: Option<Value>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SubscriptionDecl {
    pub publisher: String,
    pub events: Vec<String>,
    pub receiver: String,
}

/// Errors raised while reading a page declaration.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("invalid TOML page: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid JSON page: {0}")]
    Json(#[from] serde_json::Error),
}

impl PageConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, PageError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self, PageError> {
        Ok(serde_json::from_str(s)?)
    }
}

impl ComponentDecl {
    /// Context used when the declaration names none.
    pub fn default_context(&self) -> String {
        format!("#{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_toml_page() {
        let page = PageConfig::from_toml_str(
            r##"
            [router]
            root = "/cmps/"

            [[components]]
            id = "grid"
            options = { rows = 10 }
            usage = [{ context = "#left" }, { context = "#right", options = { rows = 5 } }]

            [[components.subscriptions]]
            publisher = "filter"
            events = ["changed"]
            receiver = "reload"
            "##,
        )
        .unwrap();

        assert_eq!(page.router.root, "/cmps/");
        let grid = &page.components[0];
        assert_eq!(grid.options, Some(json!({"rows": 10})));
        assert_eq!(grid.usage.len(), 2);
        assert_eq!(grid.usage[1].options, Some(json!({"rows": 5})));
        assert_eq!(grid.subscriptions[0].receiver, "reload");
    }

    #[test]
    fn test_json_page() {
        let page = PageConfig::from_json_str(
            r##"{"components": [{"id": "nav", "context": "#top"}]}"##,
        )
        .unwrap();
        assert_eq!(page.router, Config::default());
        assert_eq!(page.components[0].context.as_deref(), Some("#top"));
        assert_eq!(page.components[0].default_context(), "#nav");
    }

    #[test]
    fn test_bad_input() {
        assert!(matches!(
            PageConfig::from_json_str("{"),
            Err(PageError::Json(_))
        ));
        assert!(matches!(
            PageConfig::from_toml_str("components = 3"),
            Err(PageError::Toml(_))
        ));
    }
}
