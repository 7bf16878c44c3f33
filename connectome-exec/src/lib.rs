#![deny(missing_docs)]
//! Execution contexts for connectome split jobs.
//!
//! A driver loop submits one task per split; the context decides where the
//! task runs and when its result reaches the [`ResultHook`](exec0::ResultHook):
//!
//! - [`ImmediateContext`] runs the task in place and delivers at once.
//! - [`PooledContext`] dispatches to a [`WorkerPool`](exec0::WorkerPool),
//!   sweeps finished jobs opportunistically while submitting, and drains
//!   everything when asked (or when its scope ends).
//!
//! [`in_context`] picks one from [`ExecOptions`] and guarantees that every
//! submitted job is drained before the pool connection is released, on
//! every exit path of the driver.

mod context;
mod drain;
mod immediate;
mod options;
mod pending;
mod pooled;
mod selector;

pub use context::{ContextKind, ExecutionContext, Submission};
pub use immediate::ImmediateContext;
pub use options::ExecOptions;
pub use pending::PendingJob;
pub use pooled::PooledContext;
pub use selector::in_context;
