//! The context handed to a driver loop.

use crate::immediate::ImmediateContext;
use crate::pooled::PooledContext;
use exec0::error::ExecError;
use exec0::id::JobId;
use exec0::pool::WorkerPool;
use exec0::task::Task;
use std::fmt;

/// What happened to a submitted task.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission<R> {
    /// The task ran in place and no hook was installed: here is its result.
    Returned(R),
    /// The task ran in place and its result went to the hook.
    Delivered(JobId),
    /// The task was dispatched to a pool and is pending.
    Queued(JobId),
}

impl<R> Submission<R> {
    /// The job id, unless the result was returned directly.
    pub fn job(&self) -> Option<JobId> {
        match self {
            Self::Returned(_) => None,
            Self::Delivered(job) | Self::Queued(job) => Some(*job),
        }
    }

    /// The directly returned result, if any.
    pub fn into_returned(self) -> Option<R> {
        match self {
            Self::Returned(value) => Some(value),
            _ => None,
        }
    }
}

/// Which variant an [`ExecutionContext`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKind {
    /// In-process, synchronous.
    Immediate,
    /// Dispatched to a worker pool.
    Pooled,
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Immediate => f.write_str("immediate"),
            Self::Pooled => f.write_str("pooled"),
        }
    }
}

/// Either context, behind one submission interface.
///
/// Driver loops are written once against this type; [`in_context`]
/// decides which variant they get.
///
/// [`in_context`]: crate::in_context
pub enum ExecutionContext<P, R, M>
where
    P: WorkerPool,
    R: Send + 'static,
{
    /// Run tasks in place.
    Immediate(ImmediateContext<R, M>),
    /// Dispatch tasks to a pool.
    Pooled(PooledContext<P, R, M>),
}

impl<P, R, M> ExecutionContext<P, R, M>
where
    P: WorkerPool,
    R: Send + 'static,
    M: Send + 'static,
{
    /// Submit `task(args)` with `metadata` for the hook.
    pub fn submit<F, A>(
        &mut self,
        task: F,
        args: A,
        metadata: M,
    ) -> Result<Submission<R>, ExecError>
    where
        F: Task<A, Output = R>,
        A: Send + 'static,
    {
        match self {
            Self::Immediate(ctx) => ctx.submit(task, args, metadata),
            Self::Pooled(ctx) => ctx.submit(task, args, metadata).map(Submission::Queued),
        }
    }

    /// Wait for and deliver every pending job. Always `Ok(0)` in place.
    pub async fn drain(&mut self) -> Result<usize, ExecError> {
        match self {
            Self::Immediate(_) => Ok(0),
            Self::Pooled(ctx) => ctx.drain().await,
        }
    }

    /// Deliver pending jobs that have already finished, without waiting.
    pub fn sweep(&mut self) -> Result<usize, ExecError> {
        match self {
            Self::Immediate(_) => Ok(0),
            Self::Pooled(ctx) => ctx.sweep(),
        }
    }

    /// Number of jobs not yet delivered.
    pub fn pending_len(&self) -> usize {
        match self {
            Self::Immediate(_) => 0,
            Self::Pooled(ctx) => ctx.pending_len(),
        }
    }

    /// Which variant this is.
    pub fn kind(&self) -> ContextKind {
        match self {
            Self::Immediate(_) => ContextKind::Immediate,
            Self::Pooled(_) => ContextKind::Pooled,
        }
    }

    /// The pooled context, if this is one.
    pub fn as_pooled(&self) -> Option<&PooledContext<P, R, M>> {
        match self {
            Self::Pooled(ctx) => Some(ctx),
            Self::Immediate(_) => None,
        }
    }

    /// The pooled context, mutably, if this is one.
    pub fn as_pooled_mut(&mut self) -> Option<&mut PooledContext<P, R, M>> {
        match self {
            Self::Pooled(ctx) => Some(ctx),
            Self::Immediate(_) => None,
        }
    }

    /// Drain, then release the pool. Consumes the context.
    pub(crate) async fn finish(self) -> Result<usize, ExecError> {
        match self {
            Self::Immediate(_) => Ok(0),
            Self::Pooled(ctx) => ctx.shutdown().await,
        }
    }
}
