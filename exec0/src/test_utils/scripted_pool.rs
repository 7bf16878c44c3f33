//! ScriptedPool: tokio tasks with scripted completion latencies.

use crate::error::{ConfigError, PoolError, TaskError};
use crate::handle::JobHandle;
use crate::params::NormalizedParams;
use crate::pool::{PoolConnector, WorkerPool};
use crate::task::Task;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;

/// A pool that spawns each task on the current tokio runtime.
///
/// The n-th submission sleeps for the n-th scripted latency before running
/// its task (zero once the script runs out). Under a paused clock this
/// fixes the completion order independently of submission order.
pub struct ScriptedPool {
    latencies: Mutex<VecDeque<Duration>>,
    submitted: AtomicUsize,
    closed: Arc<AtomicBool>,
}

impl ScriptedPool {
    /// A pool where every job completes as soon as it is scheduled.
    pub fn new() -> Self {
        Self::from_parts(Vec::new(), Arc::new(AtomicBool::new(false)))
    }

    /// A pool following the given per-submission latencies.
    pub fn with_latencies(latencies: impl IntoIterator<Item = Duration>) -> Self {
        Self::from_parts(latencies, Arc::new(AtomicBool::new(false)))
    }

    fn from_parts(latencies: impl IntoIterator<Item = Duration>, closed: Arc<AtomicBool>) -> Self {
        Self {
            latencies: Mutex::new(latencies.into_iter().collect()),
            submitted: AtomicUsize::new(0),
            closed,
        }
    }

    /// Number of tasks accepted so far.
    pub fn submitted(&self) -> usize {
        self.submitted.load(Ordering::SeqCst)
    }
}

impl Default for ScriptedPool {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkerPool for ScriptedPool {
    type Handle<T: Send + 'static> = ScriptedHandle<T>;

    fn submit<F, A>(&self, task: F, args: A) -> Result<ScriptedHandle<F::Output>, PoolError>
    where
        F: Task<A>,
        A: Send + 'static,
    {
        if self.closed.load(Ordering::SeqCst) {
            return Err(PoolError::Closed);
        }
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| PoolError::SubmitFailed(e.to_string()))?;
        let latency = self
            .latencies
            .lock()
            .map_err(|e| PoolError::SubmitFailed(e.to_string()))?
            .pop_front()
            .unwrap_or(Duration::ZERO);
        self.submitted.fetch_add(1, Ordering::SeqCst);

        let inner = runtime.spawn(async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            task.run(args)
        });
        Ok(ScriptedHandle { inner })
    }

    fn close(self) -> impl Future<Output = Result<(), PoolError>> + Send {
        async move {
            self.closed.store(true, Ordering::SeqCst);
            Ok(())
        }
    }
}

/// Handle to a [`ScriptedPool`] job.
pub struct ScriptedHandle<T> {
    inner: tokio::task::JoinHandle<Result<T, TaskError>>,
}

impl<T> Future for ScriptedHandle<T> {
    type Output = Result<T, TaskError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.inner).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(e)) if e.is_panic() => Poll::Ready(Err(TaskError::Panicked(e.to_string()))),
            Poll::Ready(Err(e)) => Poll::Ready(Err(TaskError::Cancelled(e.to_string()))),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T: Send + 'static> JobHandle<T> for ScriptedHandle<T> {
    fn is_done(&self) -> bool {
        self.inner.is_finished()
    }
}

/// Connector handing out [`ScriptedPool`]s and recording how it was used.
///
/// Clones share their counters, so a test can keep one clone for
/// assertions and pass another to the code under test.
#[derive(Clone, Default)]
pub struct ScriptedConnector {
    latencies: Vec<Duration>,
    failure: Option<String>,
    attempts: Arc<AtomicUsize>,
    closed: Arc<AtomicBool>,
    configured: Arc<Mutex<Option<NormalizedParams>>>,
}

impl ScriptedConnector {
    /// A connector whose pools complete jobs immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the latencies of the pool this connector opens.
    pub fn with_latencies(mut self, latencies: impl IntoIterator<Item = Duration>) -> Self {
        self.latencies = latencies.into_iter().collect();
        self
    }

    /// A connector whose every connection attempt fails.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Number of connection attempts made.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Whether the last pool handed out has been closed.
    pub fn pool_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Parameters seen by the last `configure` call.
    pub fn configured(&self) -> Option<NormalizedParams> {
        self.configured.lock().ok().and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl PoolConnector for ScriptedConnector {
    type Settings = NormalizedParams;
    type Pool = ScriptedPool;

    fn configure(&self, params: &NormalizedParams) -> Result<NormalizedParams, ConfigError> {
        if let Ok(mut guard) = self.configured.lock() {
            *guard = Some(params.clone());
        }
        Ok(params.clone())
    }

    async fn connect(&self, _settings: NormalizedParams) -> Result<ScriptedPool, PoolError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.failure {
            return Err(PoolError::ConnectFailed(message.clone()));
        }
        self.closed.store(false, Ordering::SeqCst);
        Ok(ScriptedPool::from_parts(
            self.latencies.clone(),
            Arc::clone(&self.closed),
        ))
    }
}
