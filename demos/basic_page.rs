//! # Example: basic_page
//!
//! A page declared from TOML with two components, a filter and a grid.
//!
//! Demonstrates how to:
//! - Build a [`Router`] from a [`PageConfig`] and apply its declarations.
//! - Define components whose handlers publish re-entrantly.
//! - Hook host lifecycle topics.
//! - Log router lifecycle events through [`LogWriter`].
//!
//! ## Flow
//! ```text
//! configure(page) ─► filter, grid (+ grid_v0 copy) declared
//! define(filter), define(grid), load(filter)
//! host(Ready)
//!   ├─► loader tick ─► grid, grid_v0 loaded
//!   └─► filter "ready" hook ─► publish(filter, changed)
//!         ├─► grid    ─► reload
//!         └─► grid_v0 ─► reload
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example basic_page
//! ```

use serde_json::json;
use tracing_subscriber::EnvFilter;
use wcrouter::{HostTopic, LogWriter, PageConfig, Router};

const PAGE: &str = r##"
[router]
root = "/static/cmps/"

[[components]]
id = "filter"
options = { placeholder = "search..." }

[[components]]
id = "grid"
options = { rows = 10 }
usage = [{ context = "#main" }, { context = "#sidebar", options = { rows = 3 } }]

[[components.subscriptions]]
publisher = "filter"
events = ["changed"]
receiver = "reload"
"##;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // 1. Read the page and build its router
    let page = PageConfig::from_toml_str(PAGE)?;
    let router = Router::builder(page.router.clone())
        .with_observer(LogWriter::new())
        .build();
    router.configure(&page);

    // 2. Define the components
    router.define("filter", None, |cmp| {
        let me = cmp.clone();
        cmp.hook("ready", move |_, _| {
            println!("[filter] ready, placeholder = {}", me.options()["placeholder"]);
            me.publish("changed", json!({ "q": "rust" }));
        });
    });
    router.define("grid", None, |cmp| {
        let me = cmp.clone();
        cmp.out("reload", move |_, args| {
            println!(
                "[{}] reload with {} ({} rows)",
                me.id(),
                args[0],
                me.options()["rows"]
            );
        });
    });

    // 3. Let the host drive the page
    router.load("filter")?;
    let report = router.host(HostTopic::Ready, json!(null));
    println!("loader: {report:?}");
    println!("{router:?}");
    Ok(())
}
