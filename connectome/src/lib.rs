#![deny(missing_docs)]
//! # connectome: umbrella crate
//!
//! A single import surface for running connectome manipulation splits.
//! Re-exports the protocol crate and the execution contexts behind feature
//! flags, plus a `prelude` for the common driver loop.

#[cfg(feature = "core")]
pub use connectome_exec;
#[cfg(feature = "pool-local")]
pub use connectome_pool_local;
#[cfg(feature = "core")]
pub use exec0;

/// Happy-path imports for writing a driver loop.
pub mod prelude {
    #[cfg(feature = "core")]
    pub use exec0::{
        DrainInterval, ExecError, HookError, JobId, PoolConnector, PoolParams, ResultHook,
        SplitMeta, SplitPlan, Task, TaskError, WorkerPool,
    };

    #[cfg(feature = "core")]
    pub use connectome_exec::{ExecOptions, ExecutionContext, Submission, in_context};

    #[cfg(feature = "pool-local")]
    pub use connectome_pool_local::{LocalConnector, LocalPool};
}
