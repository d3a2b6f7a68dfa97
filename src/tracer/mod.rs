//! Publish tracing: the topic graph, per-call response collection and resume signals.
//!
//! ## Contents
//! - [`EventTracer`], [`TracerCache`] publisher topic → subscribers, open calls
//! - [`ResumeSignal`], [`CallId`] the token a paused handler answers with
//! - [`Invocation`] explicit per-handler context (`pause` / `resume`)
//! - [`Response`] what a publisher's callback receives
//!
//! ## Flow
//! ```text
//! publish(a.x) ──► begin_call(id) ──► bus dispatch with CallRecorder
//!                                        ├─► sub(b_y, n)   reserves n slots
//!                                        └─► handler(Invocation{a::a_x::id::b_y::slot})
//!              ──► seal(id)
//! resume(signal, data) ──► resolve ──► all slots filled + sealed ──► callback(Vec<Response>)
//! ```

mod recorder;
mod signal;
#[allow(clippy::module_inception)]
mod tracer;

pub(crate) use recorder::CallRecorder;
pub use recorder::Invocation;
pub use signal::{CallId, ResumeSignal, SIGNAL_SEPARATOR};
pub(crate) use tracer::Completion;
pub use tracer::{EventTracer, Response, ResponseCallback, TracerCache};
