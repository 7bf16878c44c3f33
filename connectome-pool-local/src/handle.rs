//! Handles to jobs running on a [`LocalPool`](crate::LocalPool).

use exec0::error::TaskError;
use exec0::handle::JobHandle;
use pin_project_lite::pin_project;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

pin_project! {
    /// Wraps the job's `JoinHandle` and turns panics into [`TaskError`]s
    /// instead of bubbling them into the caller.
    pub struct LocalJobHandle<T> {
        #[pin]
        inner: tokio::task::JoinHandle<Result<T, TaskError>>,
    }
}

impl<T> LocalJobHandle<T> {
    pub(crate) fn new(inner: tokio::task::JoinHandle<Result<T, TaskError>>) -> Self {
        Self { inner }
    }
}

impl<T> Future for LocalJobHandle<T> {
    type Output = Result<T, TaskError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        match this.inner.poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(e)) => {
                let error = join_failure(e);
                tracing::error!(error = %error, "local pool job aborted");
                Poll::Ready(Err(error))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T: Send + 'static> JobHandle<T> for LocalJobHandle<T> {
    fn is_done(&self) -> bool {
        self.inner.is_finished()
    }
}

/// Map a join failure onto the task taxonomy, keeping the panic message.
pub(crate) fn join_failure(error: tokio::task::JoinError) -> TaskError {
    if !error.is_panic() {
        return TaskError::Cancelled(error.to_string());
    }
    let payload = error.into_panic();
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_owned());
    TaskError::Panicked(message)
}
