//! # Visibility-driven loader.
//!
//! One [`tick`](Router::tick) decides, for every tracked component, whether to load it now,
//! fetch its code, or keep waiting:
//!
//! ```text
//!                  ┌─ dirty or nothing remaining ─► scan every component (creation order)
//! tick() ──────────┤
//!                  └─ otherwise ──────────────────► drain the remaining list
//!
//! Fetched                          ─► load
//! Loaded / vanished                ─► forget
//! Unfetched|Error + context visible ─► fetch (and keep tracking)
//! anything else                    ─► remaining
//! ```
//!
//! Anything that can change the answer (define, declare, subscribe, copies) marks the loader
//! dirty, forcing the next tick to rescan.

use tracing::{debug, trace};

use crate::components::{ComponentState, ENV_ID};

use super::router::{Router, State};

#[derive(Debug, Default)]
pub(crate) struct LoaderState {
    pub remaining: Vec<String>,
    pub dirty: bool,
}

/// Outcome of one loader pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Components loaded by this pass.
    pub loaded: usize,
    /// Components whose fetch this pass requested.
    pub fetching: usize,
    /// Components still tracked for a later pass.
    pub remaining: usize,
}

impl Router {
    /// Runs one loader pass.
    pub fn tick(&self) -> LoadReport {
        let candidates: Vec<(String, ComponentState, Option<String>)> = {
            let mut state = self.inner.state.borrow_mut();
            let State {
                registry, loader, ..
            } = &mut *state;

            let ids: Vec<String> = if !loader.dirty && !loader.remaining.is_empty() {
                std::mem::take(&mut loader.remaining)
            } else {
                registry
                    .ids()
                    .filter(|id| *id != ENV_ID)
                    .map(str::to_string)
                    .collect()
            };
            loader.dirty = false;

            ids.into_iter()
                .filter_map(|id| {
                    let cmp = registry.get(&id)?;
                    let (st, ctx) = (cmp.state(), cmp.context().map(str::to_string));
                    Some((id, st, ctx))
                })
                .collect()
        };

        let threshold = self.inner.cfg.threshold;
        let can_fetch = self.inner.caps.can_fetch();
        let mut to_load = Vec::new();
        let mut to_fetch = Vec::new();
        let mut remaining = Vec::new();

        for (id, st, ctx) in candidates {
            match st {
                ComponentState::Fetched => to_load.push(id),
                ComponentState::Loaded => {}
                ComponentState::Unfetched | ComponentState::Error => {
                    let visible = can_fetch
                        && ctx
                            .as_deref()
                            .is_some_and(|c| self.inner.caps.is_visible(c, threshold));
                    if visible {
                        to_fetch.push(id.clone());
                    }
                    remaining.push(id);
                }
                ComponentState::Fetching => remaining.push(id),
            }
        }

        let report = LoadReport {
            loaded: to_load.len(),
            fetching: to_fetch.len(),
            remaining: remaining.len(),
        };
        self.inner.state.borrow_mut().loader.remaining = remaining;

        for id in &to_load {
            if let Err(err) = self.load(id) {
                debug!(component = %id, error = %err, "loader skipped component");
            }
        }
        self.request_fetch(to_fetch);

        trace!(
            loaded = report.loaded,
            fetching = report.fetching,
            remaining = report.remaining,
            "loader tick"
        );
        report
    }
}
