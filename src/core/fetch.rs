//! # Fetch driving.
//!
//! Fetches are queued as local futures and driven by [`Router::settle`]. Nothing in
//! `publish` or `tick` waits on them.
//!
//! ```text
//! request_fetch(ids) ─► Unfetched|Error → Fetching ─► Config::requests ─► queue futures
//! settle().await     ─► poll all ─► finish:
//!                         Ok(defs)  ─► define each ─► load requested Fetched ones
//!                                      requested but still Fetching ─► Error + warning
//!                         Err(e)    ─► requested ─► Error (retryable)
//! ```

use std::rc::Rc;

use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use tracing::{debug, trace};

use crate::capabilities::{Asset, FetchRequest};
use crate::components::{ComponentState, Definition, Transition};
use crate::error::{FetchError, RouterError};
use crate::events::{Event, EventKind};

use super::router::Router;

impl Router {
    /// Fetches `ids` now, regardless of visibility. Ids not in `Unfetched`/`Error` are skipped.
    pub fn force_fetch(&self, ids: &[&str]) {
        self.request_fetch(ids.iter().map(|s| s.to_string()).collect());
    }

    pub(crate) fn request_fetch(&self, ids: Vec<String>) {
        let Some(fetch) = self.inner.caps.fetch() else {
            trace!(components = ids.len(), "no fetch capability");
            return;
        };

        let ids: Vec<String> = {
            let mut state = self.inner.state.borrow_mut();
            let mut accepted: Vec<String> = Vec::new();
            for id in ids {
                if accepted.contains(&id) {
                    continue;
                }
                if let Some(cmp) = state.registry.get_mut(&id) {
                    if cmp.transit(Transition::Fetch).is_ok() {
                        accepted.push(id);
                    }
                }
            }
            accepted
        };
        if ids.is_empty() {
            return;
        }

        for req in self.inner.cfg.requests(&ids) {
            debug!(url = %req.url, components = req.components.len(), "fetch started");
            self.emit(
                Event::new(EventKind::FetchStarted)
                    .with_reason(req.url.as_str())
                    .with_count(req.components.len()),
            );

            let fetch = Rc::clone(&fetch);
            let router = self.downgrade();
            let fut = async move {
                let result = fetch.fetch(&req).await;
                if let Some(router) = router.upgrade() {
                    router.finish_fetch(req, result);
                }
            }
            .boxed_local();
            self.inner.fetches.borrow_mut().push(fut);
        }
    }

    fn finish_fetch(&self, req: FetchRequest, result: Result<Vec<Definition>, FetchError>) {
        if req.asset == Asset::Style {
            if let Err(err) = result {
                debug!(url = %req.url, error = %err, "style fetch failed");
            }
            return;
        }

        match result {
            Ok(defs) => {
                self.emit(
                    Event::new(EventKind::FetchSucceeded)
                        .with_reason(req.url.as_str())
                        .with_count(defs.len()),
                );
                for def in defs {
                    self.define_with(def);
                }
                for id in &req.components {
                    match self.state(id) {
                        Some(ComponentState::Fetched) => {
                            if let Err(err) = self.load(id) {
                                debug!(component = %id, error = %err, "load after fetch skipped");
                            }
                        }
                        Some(ComponentState::Fetching) => {
                            self.fail(id);
                            self.warn(
                                RouterError::MissingDefinition { id: id.clone() },
                                Some(id.as_str()),
                            );
                        }
                        _ => {}
                    }
                }
            }
            Err(err) => {
                debug!(url = %req.url, error = %err, "fetch failed");
                for id in &req.components {
                    self.fail(id);
                }
                self.emit(
                    Event::new(EventKind::FetchFailed)
                        .with_reason(err.as_message())
                        .with_count(req.components.len()),
                );
            }
        }
    }

    fn fail(&self, id: &str) {
        let mut state = self.inner.state.borrow_mut();
        if let Some(cmp) = state.registry.get_mut(id) {
            if cmp.transit(Transition::Fail).is_err() {
                trace!(component = id, state = %cmp.state(), "fetch outcome ignored");
            }
        }
    }

    /// Drives every queued fetch, including fetches queued while settling, to completion.
    pub async fn settle(&self) {
        let mut running = FuturesUnordered::new();
        loop {
            running.extend(self.inner.fetches.borrow_mut().drain(..));
            if running.is_empty() {
                break;
            }
            running.next().await;
        }
    }

    /// Number of fetches queued and not yet picked up by [`settle`](Self::settle).
    pub fn queued_fetches(&self) -> usize {
        self.inner.fetches.borrow().len()
    }
}
