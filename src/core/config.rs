//! # Router configuration.
//!
//! Provides [`Config`], the settings a [`Router`](crate::Router) is built with:
//!
//! 1. **Fetch urls**: where component scripts (and styles) live, per-id or combo.
//! 2. **Loader threshold**: how close to the viewport a context must be to be fetched.
//!
//! ## Sentinel values
//! - `combo = None` → one script request per component (`{root}{id}.js`)
//! - `combo.css_root = None` → no style side-request
//! - `threshold = 0` → only contexts inside the viewport count as visible
//!
//! ## TOML
//! ```toml
//! root = "/static/cmps/"
//! threshold = 200
//!
//! [combo]
//! js_root = "/combo/js"
//! css_root = "/combo/css"
//! separator = "??"
//! ```

use serde::Deserialize;

use crate::capabilities::{Asset, FetchRequest};

/// Default combo separator between root and the id list.
pub const DEFAULT_COMBO_SEPARATOR: &str = "??";

/// Global configuration of one router.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Url prefix for per-component script requests.
    pub root: String,

    /// Distance (in pixels) from the viewport at which a context counts as visible.
    ///
    /// Passed verbatim to the visibility oracle.
    pub threshold: u32,

    /// Batch all components of one loader pass into a single request.
    pub combo: Option<ComboConfig>,
}

/// Combo-url settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ComboConfig {
    pub js_root: String,
    #[serde(default)]
    pub css_root: Option<String>,
    #[serde(default = "default_separator")]
    pub separator: String,
}

fn default_separator() -> String {
    DEFAULT_COMBO_SEPARATOR.to_string()
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `root = "/"`
    /// - `threshold = 0`
    /// - `combo = None` (per-component requests)
    fn default() -> Self {
        Self {
            root: "/".to_string(),
            threshold: 0,
            combo: None,
        }
    }
}

impl Config {
    /// Parses a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Returns the requests needed to fetch `ids`.
    ///
    /// # Example
    /// ```
    /// use wcrouter::{Asset, ComboConfig, Config};
    ///
    /// let per_id = Config::default().requests(&["a".into(), "b".into()]);
    /// assert_eq!(per_id[1].url, "/b.js");
    ///
    /// let combo = Config {
    ///     combo: Some(ComboConfig {
    ///         js_root: "/js".into(),
    ///         css_root: Some("/css".into()),
    ///         separator: "??".into(),
    ///     }),
    ///     ..Config::default()
    /// };
    /// let reqs = combo.requests(&["a".into(), "b".into()]);
    /// assert_eq!(reqs[0].url, "/js??a,b");
    /// assert_eq!(reqs[1].asset, Asset::Style);
    /// ```
    pub fn requests(&self, ids: &[String]) -> Vec<FetchRequest> {
        if ids.is_empty() {
            return Vec::new();
        }
        match &self.combo {
            Some(combo) => {
                let list = ids.join(",");
                let mut reqs = vec![FetchRequest {
                    url: format!("{}{}{}", combo.js_root, combo.separator, list),
                    components: ids.to_vec(),
                    asset: Asset::Script,
                }];
                if let Some(css_root) = &combo.css_root {
                    reqs.push(FetchRequest {
                        url: format!("{}{}{}", css_root, combo.separator, list),
                        components: ids.to_vec(),
                        asset: Asset::Style,
                    });
                }
                reqs
            }
            None => ids
                .iter()
                .map(|id| FetchRequest {
                    url: format!("{}{}.js", self.root, id),
                    components: vec![id.clone()],
                    asset: Asset::Script,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_toml() {
        let cfg = Config::from_toml_str("").unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn test_combo_from_toml() {
        let cfg = Config::from_toml_str(
            r#"
            root = "/c/"
            [combo]
            js_root = "/cb"
            "#,
        )
        .unwrap();
        let combo = cfg.combo.clone().unwrap();
        assert_eq!(combo.separator, "??");
        assert!(combo.css_root.is_none());

        let reqs = cfg.requests(&["x".into()]);
        assert_eq!(reqs.len(), 1);
        assert_eq!(reqs[0].url, "/cb??x");
    }

    #[test]
    fn test_no_ids_no_requests() {
        assert!(Config::default().requests(&[]).is_empty());
    }
}
