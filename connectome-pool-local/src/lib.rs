#![deny(missing_docs)]
//! In-process implementation of exec0's WorkerPool trait.
//!
//! Every submission is spawned onto the ambient tokio runtime right away,
//! waits for one of `workers` permits, then runs on tokio's blocking thread
//! pool so CPU-heavy split manipulations never stall the async workers.
//! No durability: a job that fails or panics is reported, not retried.

mod connector;
mod handle;

pub use connector::{LocalConnector, LocalSettings};
pub use handle::LocalJobHandle;

use exec0::error::{PoolError, TaskError};
use exec0::pool::WorkerPool;
use exec0::task::Task;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Worker pool backed by tokio's blocking thread pool.
///
/// At most `workers` tasks run at the same time; the rest wait for a
/// permit. Suitable for single-machine runs and for exercising the pooled
/// code path in tests.
pub struct LocalPool {
    runtime: tokio::runtime::Handle,
    permits: Arc<Semaphore>,
    workers: usize,
    name: String,
}

impl LocalPool {
    /// Create a pool on the current tokio runtime.
    ///
    /// Fails when called outside a runtime. A worker count of zero is
    /// treated as one.
    pub fn new(workers: usize) -> Result<Self, PoolError> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| PoolError::ConnectFailed(format!("no tokio runtime: {e}")))?;
        let workers = workers.clamp(1, Semaphore::MAX_PERMITS);
        Ok(Self {
            runtime,
            permits: Arc::new(Semaphore::new(workers)),
            workers,
            name: "local".to_owned(),
        })
    }

    /// Label used in log events.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Maximum number of tasks running at once.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// The pool's label.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl WorkerPool for LocalPool {
    type Handle<T: Send + 'static> = LocalJobHandle<T>;

    fn submit<F, A>(&self, task: F, args: A) -> Result<LocalJobHandle<F::Output>, PoolError>
    where
        F: Task<A>,
        A: Send + 'static,
    {
        let permits = Arc::clone(&self.permits);
        let inner = self.runtime.spawn(run_job(permits, task, args));
        Ok(LocalJobHandle::new(inner))
    }

    fn close(self) -> impl Future<Output = Result<(), PoolError>> + Send {
        async move {
            self.permits.close();
            tracing::debug!(pool = %self.name, workers = self.workers, "local pool closed");
            Ok(())
        }
    }
}

async fn run_job<F, A>(permits: Arc<Semaphore>, task: F, args: A) -> Result<F::Output, TaskError>
where
    F: Task<A>,
    A: Send + 'static,
{
    let _permit = permits
        .acquire_owned()
        .await
        .map_err(|_| TaskError::Cancelled("pool closed before the job started".into()))?;
    match tokio::task::spawn_blocking(move || task.run(args)).await {
        Ok(result) => result,
        Err(e) => Err(handle::join_failure(e)),
    }
}
