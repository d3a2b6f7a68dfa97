//! # Example: lazy_fetch
//!
//! Components whose code is fetched only when their host context becomes visible.
//!
//! Demonstrates how to:
//! - Implement the [`Fetch`] capability (here: an in-memory bundle table with latency).
//! - Plug a [`Visibility`] oracle and drive the loader with `host(...)`.
//! - Buffer deliveries for components that are still being fetched.
//! - Retry a component whose first fetch failed.
//!
//! ## Flow
//! ```text
//! host(Ready)   ─► "#header" visible ─► GET /cmps/header.js
//! publish(nav, go) ─► footer not fetched yet ─► buffered + GET /cmps/footer.js (fails)
//! settle()      ─► header loaded, footer Error
//! publish(nav, go) ─► footer retried
//! settle()      ─► footer loaded ─► buffered "go" replayed once with the latest data
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=wcrouter=debug cargo run --example lazy_fetch
//! ```

use std::cell::Cell;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing_subscriber::EnvFilter;
use wcrouter::{
    Config, Definition, Fetch, FetchError, FetchRequest, HostTopic, LogWriter, Router,
};

/// Serves component bundles from memory. The first request for `footer` fails.
struct Bundles {
    footer_attempts: Cell<u32>,
}

#[async_trait(?Send)]
impl Fetch for Bundles {
    async fn fetch(&self, req: &FetchRequest) -> Result<Vec<Definition>, FetchError> {
        tokio::time::sleep(Duration::from_millis(50)).await;
        println!("[fetch] {}", req.url);

        let mut defs = Vec::new();
        for id in &req.components {
            if id == "footer" {
                let n = self.footer_attempts.get() + 1;
                self.footer_attempts.set(n);
                if n == 1 {
                    return Err(FetchError::failed(&req.url, "connection reset"));
                }
            }
            let name = id.clone();
            defs.push(Definition::new(id.clone(), move |cmp| {
                println!("[{name}] factory ran in {:?}", cmp.context());
                let name = name.clone();
                cmp.out("navigate", move |_, args| {
                    println!("[{name}] navigate to {}", args[0]);
                });
            }));
        }
        Ok(defs)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // 1. Router with a fetch capability and a viewport oracle
    let cfg = Config {
        root: "/cmps/".into(),
        threshold: 100,
        ..Config::default()
    };
    let router = Router::builder(cfg)
        .with_fetch(Bundles {
            footer_attempts: Cell::new(0),
        })
        .with_visibility(|ctx: &str, _threshold: u32| ctx == "#header")
        .with_observer(LogWriter::new())
        .build();

    // 2. Declare the page
    router.declare("header").context("#header");
    router
        .declare("footer")
        .context("#footer")
        .subscribe("nav", &["go"], "navigate");

    // 3. Only the header is visible
    let report = router.host(HostTopic::Ready, json!(null));
    println!("loader: {report:?}");

    // 4. Publishing to the footer fetches it on demand; the first attempt fails
    router.publish("nav", "go", json!("/home"));
    router.settle().await;
    println!("footer is {:?}, {} buffered", router.state("footer"), router.pending_count("footer"));

    // 5. Publishing again retries; the buffered delivery keeps only the latest data
    router.publish("nav", "go", json!("/about"));
    router.settle().await;
    println!("footer is {:?}", router.state("footer"));
    Ok(())
}
