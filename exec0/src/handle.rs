//! Job handles: in-flight or completed submissions.

use crate::error::TaskError;
use std::future::Future;

/// A handle to a task submitted to a [`WorkerPool`](crate::WorkerPool).
///
/// The handle is a future resolving to the task's result (or the failure
/// the pool captured). Waiting on any of a set of handles is done by
/// streaming them through `futures::stream::FuturesUnordered`, which yields
/// in completion order.
///
/// Handles are `Unpin` so a context can probe them, move them back into its
/// pending set, and poll them again later without pinning gymnastics.
pub trait JobHandle<T>: Future<Output = Result<T, TaskError>> + Send + Unpin {
    /// Whether the job has finished, successfully or not.
    ///
    /// Never blocks. A `true` answer means polling the handle resolves
    /// immediately.
    fn is_done(&self) -> bool;

    /// Give the handle's resources back to the pool once its result has
    /// been taken.
    fn release(self)
    where
        Self: Sized,
    {
        drop(self);
    }
}
