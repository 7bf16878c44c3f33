//! # exec0: Protocol traits for dispatching connectome split jobs
//!
//! A connectome is manipulated one split at a time: a contiguous block of
//! nodes is handed to a task, and the task's output (usually a rewritten
//! edge table) is persisted by a result hook. This crate defines the
//! boundaries between the pieces involved so that the same driver loop can
//! run in-process or against a pool of workers.
//!
//! ## The Boundaries
//!
//! | Boundary | Trait | What it does |
//! |----------|-------|-------------|
//! | ① Work | [`Task`] | One split's computation, arguments in, result out |
//! | ② Dispatch | [`WorkerPool`], [`JobHandle`] | Ship a task somewhere, track it |
//! | ③ Connection | [`PoolConnector`] | Validate parameters, open a pool |
//! | ④ Delivery | [`ResultHook`] | Consume `(result, metadata)` once per job |
//!
//! Supporting types: [`JobId`], [`DrainInterval`], [`PoolParams`] /
//! [`NormalizedParams`] and [`SplitPlan`] / [`SplitMeta`].
//!
//! ## Design Principle
//!
//! Dispatch is capability-defined, not runtime-defined. A pool only has to
//! accept a task without blocking and hand back a future-like handle that
//! can be probed with [`JobHandle::is_done`]. Waiting on many handles at
//! once is a stream over those futures, so a thread pool, a process pool
//! and a remote cluster client all fit behind the same trait.

#![deny(missing_docs)]

pub mod duration;
pub mod error;
pub mod handle;
pub mod hook;
pub mod id;
pub mod params;
pub mod pool;
pub mod split;
pub mod task;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use duration::DrainInterval;
pub use error::{ConfigError, ExecError, HookError, PoolError, TaskError};
pub use handle::JobHandle;
pub use hook::ResultHook;
pub use id::JobId;
pub use params::{NormalizedParams, ParamValue, PoolParams};
pub use pool::{PoolConnector, WorkerPool};
pub use split::{SplitMeta, SplitPlan, resolve_split_count};
pub use task::Task;
