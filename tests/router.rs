use std::cell::{Cell, RefCell};
use std::rc::Rc;

use async_trait::async_trait;
use serde_json::{json, Value};
use wcrouter::{
    ComboConfig, ComponentState, Config, Definition, EventCollector, EventKind, Fetch, FetchError,
    FetchRequest, HostTopic, Invocation, PageConfig, Response, ResumeSignal, Router, SignalError,
};

type Log = Rc<RefCell<Vec<Value>>>;

fn log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

/// Defines `id` with one handler on `event` that records its first argument.
fn define_recording(router: &Router, id: &str, event: &str, sink: &Log) {
    let sink = Rc::clone(sink);
    let event = event.to_string();
    router.define(id, None, move |cmp| {
        let sink = Rc::clone(&sink);
        cmp.out(&event, move |_, args| sink.borrow_mut().push(args[0].clone()));
    });
}

/// Defines `id` whose handlers on `event` pause and hand their signals to `signals`.
fn define_pausing(
    router: &Router,
    id: &str,
    event: &str,
    handlers: usize,
    signals: &Rc<RefCell<Vec<ResumeSignal>>>,
) {
    let signals = Rc::clone(signals);
    let event = event.to_string();
    router.define(id, None, move |cmp| {
        for _ in 0..handlers {
            let signals = Rc::clone(&signals);
            cmp.out(&event, move |inv, _| {
                if let Some(sig) = inv.pause() {
                    signals.borrow_mut().push(sig);
                }
            });
        }
    });
}

fn responses_sink() -> (Rc<RefCell<Option<Vec<Response>>>>, impl FnOnce(Vec<Response>) + 'static) {
    let slot = Rc::new(RefCell::new(None));
    let s = Rc::clone(&slot);
    (slot, move |r: Vec<Response>| *s.borrow_mut() = Some(r))
}

// ---- ordering ----

#[test]
fn test_subscription_order_relative_to_define_does_not_matter() {
    let early = Router::new(Config::default());
    let seen_early = log();
    early.subscribe("b", "a", &["x"], "y");
    define_recording(&early, "b", "y", &seen_early);
    early.publish("a", "x", json!(1));

    let late = Router::new(Config::default());
    let seen_late = log();
    define_recording(&late, "b", "y", &seen_late);
    late.subscribe("b", "a", &["x"], "y");
    late.publish("a", "x", json!(1));

    assert_eq!(*seen_early.borrow(), vec![json!(1)]);
    assert_eq!(*seen_early.borrow(), *seen_late.borrow());
}

#[test]
fn test_publish_without_subscribers_is_noop() {
    let router = Router::new(Config::default());
    let seen = log();
    define_recording(&router, "b", "y", &seen);

    router.publish("a", "x", json!(1));
    router.subscribe("b", "a", &["x"], "y");

    assert!(seen.borrow().is_empty());
    assert_eq!(router.state("b"), Some(ComponentState::Fetched));

    router.publish("a", "x", json!(2));
    assert_eq!(*seen.borrow(), vec![json!(2)]);
    assert_eq!(router.state("b"), Some(ComponentState::Loaded));
}

#[test]
fn test_handlers_and_receiver_events_run_back_to_front() {
    let router = Router::new(Config::default());
    let order = Rc::new(RefCell::new(Vec::new()));
    let o = Rc::clone(&order);
    router.define("b", None, move |cmp| {
        for (event, tag) in [("y", "y1"), ("y", "y2"), ("z", "z1")] {
            let o = Rc::clone(&o);
            cmp.out(event, move |_, _| o.borrow_mut().push(tag));
        }
    });
    router.subscribe("b", "a", &["x"], "y");
    router.subscribe("b", "a", &["x"], "z");

    router.publish("a", "x", Value::Null);
    assert_eq!(*order.borrow(), vec!["z1", "y2", "y1"]);
}

#[test]
fn test_once_handler_runs_once() {
    let router = Router::new(Config::default());
    let hits = Rc::new(Cell::new(0));
    let h = Rc::clone(&hits);
    router.define("b", None, move |cmp| {
        let h = Rc::clone(&h);
        cmp.once("y", move |_, _| h.set(h.get() + 1));
    });
    router.subscribe("b", "a", &["x"], "y");

    router.publish("a", "x", json!(1));
    router.publish("a", "x", json!(2));

    assert_eq!(hits.get(), 1);
    assert_eq!(router.handler_count("b", "y"), 0);
}

#[test]
fn test_handlers_may_publish_reentrantly() {
    let router = Router::new(Config::default());
    let seen = log();
    router.define("b", None, |cmp| {
        let me = cmp.clone();
        cmp.out("y", move |_, args| me.publish("done", args[0].clone()));
    });
    define_recording(&router, "c", "z", &seen);
    router.subscribe("b", "a", &["x"], "y");
    router.subscribe("c", "b", &["done"], "z");

    router.publish("a", "x", json!("ping"));
    assert_eq!(*seen.borrow(), vec![json!("ping")]);
}

// ---- buffering ----

#[test]
fn test_buffered_deliveries_dedup_and_replay_back_to_front() {
    let events = EventCollector::new();
    let router = Router::builder(Config::default())
        .with_observer(events.clone())
        .build();
    router.subscribe("b", "a", &["x", "w"], "y");

    router.publish("a", "x", json!(1));
    router.publish("a", "x", json!(2));
    router.publish("a", "w", json!(3));
    assert_eq!(router.pending_count("b"), 2);
    assert_eq!(events.count(EventKind::DeliveryBuffered), 3);

    let seen = log();
    define_recording(&router, "b", "y", &seen);
    let report = router.tick();

    assert_eq!(report.loaded, 1);
    assert_eq!(*seen.borrow(), vec![json!(3), json!(2)]);
    assert_eq!(router.pending_count("b"), 0);
    assert_eq!(events.count(EventKind::BufferReplayed), 2);
}

#[test]
fn test_publish_loads_fetched_subscriber_before_delivery() {
    let router = Router::new(Config::default());
    let seen = log();
    define_recording(&router, "b", "y", &seen);
    router.subscribe("b", "a", &["x"], "y");

    assert_eq!(router.state("b"), Some(ComponentState::Fetched));
    router.publish("a", "x", json!([1, 2]));

    assert_eq!(router.state("b"), Some(ComponentState::Loaded));
    assert_eq!(*seen.borrow(), vec![json!(1)]);
}

// ---- responses ----

#[test]
fn test_responses_complete_in_any_resume_order() {
    let router = Router::new(Config::default());
    let signals = Rc::new(RefCell::new(Vec::new()));
    define_pausing(&router, "p", "count", 2, &signals);
    router.define("q", None, |cmp| {
        cmp.out("count", |inv, _| {
            if let Some(sig) = inv.pause() {
                inv.resume(&sig, json!(7));
            }
        });
    });
    router.subscribe("p", "grid", &["query"], "count");
    router.subscribe("q", "grid", &["query"], "count");

    let (got, cb) = responses_sink();
    router.publish_with("grid", "query", json!({}), cb);

    assert!(got.borrow().is_none());
    assert_eq!(router.open_calls("grid", "query"), 1);

    let pending: Vec<ResumeSignal> = signals.borrow_mut().drain(..).collect();
    assert_eq!(pending.len(), 2);
    for sig in pending.iter().rev() {
        assert_eq!(router.resume(sig, json!(sig.slot())), Ok(()));
    }

    let responses = got.borrow_mut().take().unwrap();
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0].subscriber, "p_count");
    assert_eq!(responses[0].values, vec![json!(0), json!(1)]);
    assert_eq!(responses[1].subscriber, "q_count");
    assert_eq!(responses[1].values, vec![json!(7)]);
    assert_eq!(router.open_calls("grid", "query"), 0);
}

#[test]
fn test_synchronous_responses_fire_at_end_of_publish() {
    let router = Router::new(Config::default());
    router.define("q", None, |cmp| {
        cmp.out("count", |inv, args| {
            if let Some(sig) = inv.pause() {
                inv.resume(&sig, args[0].clone());
            }
        });
    });
    router.subscribe("q", "grid", &["query"], "count");

    let (got, cb) = responses_sink();
    router.publish_with("grid", "query", json!(5), cb);

    let responses = got.borrow_mut().take().unwrap();
    assert_eq!(responses[0].values, vec![json!(5)]);
}

#[test]
fn test_overlapping_calls_are_correlated_separately() {
    let router = Router::new(Config::default());
    let signals = Rc::new(RefCell::new(Vec::new()));
    define_pausing(&router, "p", "count", 1, &signals);
    router.subscribe("p", "grid", &["query"], "count");

    let (first, cb1) = responses_sink();
    let (second, cb2) = responses_sink();
    router.publish_with("grid", "query", json!(1), cb1);
    router.publish_with("grid", "query", json!(2), cb2);
    assert_eq!(router.open_calls("grid", "query"), 2);

    let sigs = signals.borrow().clone();
    assert_ne!(sigs[0].call(), sigs[1].call());

    router.resume(&sigs[1], json!("b")).unwrap();
    assert!(first.borrow().is_none());
    assert_eq!(second.borrow().as_ref().unwrap()[0].values, vec![json!("b")]);

    router.resume(&sigs[0], json!("a")).unwrap();
    assert_eq!(first.borrow().as_ref().unwrap()[0].values, vec![json!("a")]);
    assert_eq!(router.open_calls("grid", "query"), 0);
}

#[test]
fn test_once_handler_consumed_by_nested_publish_does_not_block_callback() {
    let router = Router::new(Config::default());
    router.define("b", None, |cmp| {
        cmp.once("y", |inv, _| {
            if let Some(sig) = inv.pause() {
                inv.resume(&sig, json!("once"));
            }
        });
        let nested = Cell::new(false);
        cmp.out("y", move |inv, _| {
            if let Some(sig) = inv.pause() {
                inv.resume(&sig, json!("always"));
            }
            if !nested.replace(true) {
                if let Some(router) = inv.router() {
                    router.publish("a", "x2", json!(2));
                }
            }
        });
    });
    router.subscribe("b", "a", &["x"], "y");
    router.subscribe("b", "a", &["x2"], "y");

    let (got, cb) = responses_sink();
    router.publish_with("a", "x", json!(1), cb);

    let got = got.borrow_mut().take().expect("callback fired");
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].subscriber, "b_y");
    assert_eq!(got[0].values, vec![json!("always")]);
    assert_eq!(router.open_calls("a", "x"), 0);
    assert_eq!(router.open_calls("a", "x2"), 0);
}

#[test]
fn test_callback_never_runs_without_responders() {
    let router = Router::new(Config::default());
    router.define("p", None, |_| {});
    router.subscribe("p", "grid", &["query"], "count");

    let fired = Rc::new(Cell::new(false));
    let f = Rc::clone(&fired);
    router.publish_with("grid", "query", Value::Null, move |_| f.set(true));

    assert!(!fired.get());
    assert_eq!(router.open_calls("grid", "query"), 0);
}

#[test]
fn test_stale_signal_is_rejected_and_dropped() {
    let events = EventCollector::new();
    let router = Router::builder(Config::default())
        .with_observer(events.clone())
        .build();
    let kept: Rc<RefCell<Option<(Invocation, ResumeSignal)>>> = Rc::new(RefCell::new(None));
    let k = Rc::clone(&kept);
    router.define("p", None, move |cmp| {
        let k = Rc::clone(&k);
        cmp.out("count", move |inv, _| {
            if let Some(sig) = inv.pause() {
                inv.resume(&sig, json!(1));
                *k.borrow_mut() = Some((inv.clone(), sig));
            }
        });
    });
    router.subscribe("p", "grid", &["query"], "count");
    router.publish_with("grid", "query", Value::Null, |_| {});

    let (inv, sig) = kept.borrow_mut().take().unwrap();
    assert!(matches!(
        router.resume(&sig, json!(2)),
        Err(SignalError::CallClosed { .. })
    ));

    inv.resume(&sig, json!(2));
    assert_eq!(events.count(EventKind::SignalDropped), 1);

    let forged: ResumeSignal = "grid::grid_query::1::nobody_count::0".parse().unwrap();
    assert!(router.resume(&forged, Value::Null).is_err());
}

// ---- fetch & loader ----

#[derive(Default)]
struct TableFetch {
    urls: RefCell<Vec<String>>,
    fail_first: Cell<usize>,
    empty: bool,
    seen: Log,
}

#[async_trait(?Send)]
impl Fetch for TableFetch {
    async fn fetch(&self, req: &FetchRequest) -> Result<Vec<Definition>, FetchError> {
        self.urls.borrow_mut().push(req.url.clone());
        if self.fail_first.get() > 0 {
            self.fail_first.set(self.fail_first.get() - 1);
            return Err(FetchError::failed(&req.url, "offline"));
        }
        if self.empty {
            return Ok(Vec::new());
        }
        let defs = req
            .components
            .iter()
            .map(|id| {
                let sink = Rc::clone(&self.seen);
                Definition::new(id.clone(), move |cmp| {
                    let sink = Rc::clone(&sink);
                    cmp.out("y", move |_, args| sink.borrow_mut().push(args[0].clone()));
                })
            })
            .collect();
        Ok(defs)
    }
}

fn table(fail_first: usize, empty: bool) -> (TableFetch, Log) {
    let seen = log();
    let fetch = TableFetch {
        fail_first: Cell::new(fail_first),
        empty,
        seen: Rc::clone(&seen),
        ..TableFetch::default()
    };
    (fetch, seen)
}

#[tokio::test]
async fn test_publish_fetches_then_replays() {
    let (fetch, seen) = table(0, false);
    let router = Router::builder(Config::default()).with_fetch(fetch).build();
    router.subscribe("b", "a", &["x"], "y");

    router.publish("a", "x", json!(1));
    router.publish("a", "x", json!(2));
    assert_eq!(router.state("b"), Some(ComponentState::Fetching));
    assert_eq!(router.queued_fetches(), 1);

    router.settle().await;

    assert_eq!(router.state("b"), Some(ComponentState::Loaded));
    assert_eq!(*seen.borrow(), vec![json!(2)]);
}

#[tokio::test]
async fn test_failed_fetch_is_retried_on_next_publish() {
    let events = EventCollector::new();
    let (fetch, seen) = table(1, false);
    let router = Router::builder(Config::default())
        .with_fetch(fetch)
        .with_observer(events.clone())
        .build();
    router.subscribe("b", "a", &["x"], "y");

    router.publish("a", "x", json!(1));
    router.settle().await;
    assert_eq!(router.state("b"), Some(ComponentState::Error));
    assert_eq!(router.pending_count("b"), 1);
    assert_eq!(events.count(EventKind::FetchFailed), 1);

    router.publish("a", "x", json!(2));
    router.settle().await;
    assert_eq!(router.state("b"), Some(ComponentState::Loaded));
    assert_eq!(*seen.borrow(), vec![json!(2)]);
}

#[tokio::test]
async fn test_fetch_without_definition_marks_error() {
    let events = EventCollector::new();
    let (fetch, _) = table(0, true);
    let router = Router::builder(Config::default())
        .with_fetch(fetch)
        .with_observer(events.clone())
        .build();
    router.subscribe("b", "a", &["x"], "y");

    router.publish("a", "x", json!(1));
    router.settle().await;

    assert_eq!(router.state("b"), Some(ComponentState::Error));
    assert_eq!(
        events.last(EventKind::ConfigWarning).unwrap().reason.as_deref(),
        Some("missing definition: b")
    );
}

#[tokio::test]
async fn test_loader_fetches_only_visible_contexts_in_one_combo() {
    let (fetch, seen) = table(0, false);
    let fetch = Rc::new(fetch);
    let cfg = Config {
        combo: Some(ComboConfig {
            js_root: "/js".into(),
            css_root: Some("/css".into()),
            separator: "??".into(),
        }),
        ..Config::default()
    };
    let router = Router::builder(cfg)
        .with_fetch(SharedFetch(Rc::clone(&fetch)))
        .with_visibility(|ctx: &str, _threshold: u32| ctx != "#bottom")
        .build();
    router.declare("top").context("#top");
    router.declare("side").context("#side");
    router.declare("bottom").context("#bottom");

    let report = router.host(HostTopic::Ready, Value::Null);
    assert_eq!(report.fetching, 2);
    assert_eq!(report.remaining, 3);

    router.settle().await;
    let mut urls = fetch.urls.borrow().clone();
    urls.sort();
    assert_eq!(urls, vec!["/css??top,side", "/js??top,side"]);
    assert_eq!(router.state("top"), Some(ComponentState::Loaded));
    assert_eq!(router.state("side"), Some(ComponentState::Loaded));
    assert_eq!(router.state("bottom"), Some(ComponentState::Unfetched));

    let report = router.tick();
    assert_eq!(report.remaining, 1);
    assert_eq!(report.fetching, 0);
    assert!(seen.borrow().is_empty());
}

#[tokio::test]
async fn test_force_fetch_ignores_visibility() {
    let (fetch, _) = table(0, false);
    let router = Router::builder(Config::default()).with_fetch(fetch).build();
    router.declare("b");

    router.force_fetch(&["b", "b", "ghost"]);
    assert_eq!(router.queued_fetches(), 1);
    router.settle().await;
    assert_eq!(router.state("b"), Some(ComponentState::Loaded));
}

struct SharedFetch(Rc<TableFetch>);

#[async_trait(?Send)]
impl Fetch for SharedFetch {
    async fn fetch(&self, req: &FetchRequest) -> Result<Vec<Definition>, FetchError> {
        self.0.fetch(req).await
    }
}

// ---- declarations ----

#[test]
fn test_declare_copies_share_subscriptions_and_definition() {
    let router = Router::new(Config::default());
    router
        .declare("grid")
        .options(json!({"rows": 10}))
        .contexts(&["#left", "#right"], Some(json!({"rows": 5})))
        .subscribe("filter", &["changed"], "reload");

    assert_eq!(router.context("grid").as_deref(), Some("#right"));
    assert_eq!(router.copies_of("grid"), vec!["grid_v0".to_string()]);
    assert_eq!(router.context("grid_v0").as_deref(), Some("#left"));

    let seen = log();
    define_recording(&router, "grid", "reload", &seen);
    assert_eq!(router.state("grid_v0"), Some(ComponentState::Fetched));

    router.publish("filter", "changed", json!("q"));
    assert_eq!(*seen.borrow(), vec![json!("q"), json!("q")]);
}

#[test]
fn test_configure_from_toml_page() {
    let page = PageConfig::from_toml_str(
        r##"
        [router]
        root = "/cmps/"

        [[components]]
        id = "filter"

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
    let router = Router::new(page.router.clone());
    router.configure(&page);

    assert_eq!(router.config().root, "/cmps/");
    assert_eq!(router.context("filter").as_deref(), Some("#filter"));
    assert_eq!(router.context("grid").as_deref(), Some("#left"));
    assert_eq!(router.options("grid"), Some(json!({"rows": 10})));
    assert_eq!(router.options("grid_v0"), Some(json!({"rows": 5})));
    assert_eq!(router.subscribers_of("filter", "changed").len(), 2);
}

#[test]
fn test_injected_capability_reaches_components() {
    let router = Router::builder(Config::default())
        .inject("util", 42u32)
        .build();
    let got = Rc::new(Cell::new(0));
    let g = Rc::clone(&got);
    router.define("b", None, move |cmp| {
        if let Some(v) = cmp.capability::<u32>("util") {
            g.set(*v);
        }
    });
    router.load("b").unwrap();
    assert_eq!(got.get(), 42);
}
