//! Jobs owned by a pooled context until they are drained.

use exec0::error::TaskError;
use exec0::handle::JobHandle;
use exec0::id::JobId;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

/// An outstanding job: the pool's handle plus the metadata that travels
/// with it back to the result hook.
pub struct PendingJob<H, M> {
    pub(crate) id: JobId,
    pub(crate) handle: H,
    pub(crate) metadata: M,
}

pub(crate) struct Completed<R, M> {
    pub(crate) id: JobId,
    pub(crate) metadata: M,
    pub(crate) result: Result<R, TaskError>,
}

impl<H, M> PendingJob<H, M> {
    pub(crate) fn new(id: JobId, handle: H, metadata: M) -> Self {
        Self {
            id,
            handle,
            metadata,
        }
    }

    /// The id assigned at submission.
    pub fn id(&self) -> JobId {
        self.id
    }

    /// The metadata attached at submission.
    pub fn metadata(&self) -> &M {
        &self.metadata
    }
}

/// A pending job being waited on by a drain.
///
/// Resolves once, releasing the handle. Until then the job can be taken
/// back with [`into_job`](Self::into_job), so an interrupted drain loses
/// nothing.
pub(crate) struct Completion<R, H, M> {
    job: Option<PendingJob<H, M>>,
    _result: PhantomData<fn() -> R>,
}

impl<R, H, M> Completion<R, H, M> {
    pub(crate) fn new(job: PendingJob<H, M>) -> Self {
        Self {
            job: Some(job),
            _result: PhantomData,
        }
    }

    pub(crate) fn job(&self) -> Option<&PendingJob<H, M>> {
        self.job.as_ref()
    }

    pub(crate) fn into_job(self) -> Option<PendingJob<H, M>> {
        self.job
    }
}

// Fields are never pinned structurally; handles are `Unpin` themselves.
impl<R, H, M> Unpin for Completion<R, H, M> {}

impl<R, H, M> Future for Completion<R, H, M>
where
    H: JobHandle<R>,
{
    type Output = Completed<R, M>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let Some(job) = self.job.as_mut() else {
            return Poll::Pending;
        };
        let result = ready!(Pin::new(&mut job.handle).poll(cx));
        let Some(PendingJob {
            id,
            handle,
            metadata,
        }) = self.job.take()
        else {
            return Poll::Pending;
        };
        handle.release();
        Poll::Ready(Completed {
            id,
            metadata,
            result,
        })
    }
}
