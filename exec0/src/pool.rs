//! The Dispatch and Connection boundaries.

use crate::error::{ConfigError, PoolError};
use crate::handle::JobHandle;
use crate::params::NormalizedParams;
use crate::task::Task;
use async_trait::async_trait;
use std::future::Future;

/// Capability interface over an external pool of workers.
///
/// Implementations:
/// - `LocalPool`: tokio's blocking thread pool, in-process
/// - a process pool or a remote cluster client, behind the same contract
///
/// The key property: `submit` hands the task over and returns at once.
/// Whether the task runs on the next core or on another machine is the
/// pool's business; the caller only ever sees the handle.
pub trait WorkerPool: Send + Sync {
    /// Handle type for a job producing `T`.
    type Handle<T: Send + 'static>: JobHandle<T>;

    /// Dispatch `task(args)` without waiting for it to run.
    fn submit<F, A>(&self, task: F, args: A) -> Result<Self::Handle<F::Output>, PoolError>
    where
        F: Task<A>,
        A: Send + 'static;

    /// Release the connection. Jobs still in flight are the caller's
    /// problem; contexts drain before closing.
    fn close(self) -> impl Future<Output = Result<(), PoolError>> + Send
    where
        Self: Sized;
}

/// Opens a [`WorkerPool`] from connection parameters.
///
/// Connection is two-phase so that a bad parameter is reported as a
/// configuration error before anything is acquired, and an unreachable
/// pool is reported as a connection error.
#[async_trait]
pub trait PoolConnector: Send + Sync {
    /// Typed settings extracted from the parameters.
    type Settings: Send;

    /// The pool this connector opens.
    type Pool: WorkerPool;

    /// Read and validate the parameters this connector understands.
    fn configure(&self, params: &NormalizedParams) -> Result<Self::Settings, ConfigError>;

    /// Acquire the pool connection.
    async fn connect(&self, settings: Self::Settings) -> Result<Self::Pool, PoolError>;
}
