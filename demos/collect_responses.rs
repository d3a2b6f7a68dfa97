//! # Example: collect_responses
//!
//! A publisher asks its subscribers a question and collects their answers, some of which
//! arrive later.
//!
//! Demonstrates how to:
//! - Publish with a response callback.
//! - Answer synchronously with `pause` + `resume` inside the handler.
//! - Answer later by keeping the [`ResumeSignal`] and resuming from outside.
//!
//! ## Flow
//! ```text
//! cart.publish_with("total", ...)
//!   ├─► prices handler ─► pause ─► resume now      (slot filled)
//!   └─► stock  handler ─► pause ─► signal kept     (slot open)
//! ... later: router.resume(signal, 3)
//!   └─► all slots filled ─► callback([prices_quote, stock_quote])
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example collect_responses
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::json;
use tracing_subscriber::EnvFilter;
use wcrouter::{Config, EventCollector, EventKind, LogWriter, ResumeSignal, Router};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let events = EventCollector::new();
    let router = Router::builder(Config::default())
        .with_observer(LogWriter::new())
        .with_observer(events.clone())
        .build();

    // 1. "prices" answers immediately
    router.define("prices", None, |cmp| {
        cmp.out("quote", |inv, args| {
            let items = args[0]["items"].as_array().map_or(0, Vec::len);
            if let Some(sig) = inv.pause() {
                inv.resume(&sig, json!(items * 10));
            }
        });
    });

    // 2. "stock" answers later
    let parked: Rc<RefCell<Vec<ResumeSignal>>> = Rc::default();
    let park = Rc::clone(&parked);
    router.define("stock", None, move |cmp| {
        let park = Rc::clone(&park);
        cmp.out("quote", move |inv, _| {
            if let Some(sig) = inv.pause() {
                println!("[stock] parked {sig}");
                park.borrow_mut().push(sig);
            }
        });
    });

    router.subscribe("prices", "cart", &["total"], "quote");
    router.subscribe("stock", "cart", &["total"], "quote");

    // 3. Ask
    router.publish_with("cart", "total", json!({ "items": [1, 2, 3] }), |responses| {
        for r in responses {
            println!("[cart] {} answered {:?}", r.subscriber, r.values);
        }
    });
    println!("open calls: {}", router.open_calls("cart", "total"));

    // 4. Answer the parked question
    let signals: Vec<ResumeSignal> = parked.borrow_mut().drain(..).collect();
    for sig in &signals {
        router.resume(sig, json!(3))?;
    }

    // 5. A second answer to a closed call is rejected
    if let Some(sig) = signals.first() {
        if let Err(err) = router.resume(sig, json!(4)) {
            println!("late answer rejected: {err}");
        }
    }
    println!("completed calls: {}", events.count(EventKind::CallCompleted));
    Ok(())
}
