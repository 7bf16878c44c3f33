//! Dispatch to a worker pool with deferred delivery.

use crate::drain::{DrainPass, deliver};
use crate::pending::{Completion, PendingJob};
use exec0::duration::DrainInterval;
use exec0::error::{ExecError, TaskError};
use exec0::handle::JobHandle;
use exec0::hook::ResultHook;
use exec0::id::JobId;
use exec0::pool::WorkerPool;
use exec0::task::Task;
use futures::FutureExt;
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use std::time::Duration;
use tokio::time::Instant;

/// Pending jobs of a [`PooledContext`] over pool `P`.
pub type PendingJobs<P, R, M> = Vec<PendingJob<<P as WorkerPool>::Handle<R>, M>>;

/// Submits tasks to a [`WorkerPool`] and delivers their results later.
///
/// Every submitted job sits in the pending set until it is delivered. The
/// set shrinks in two ways:
///
/// - an opportunistic sweep on [`submit`](Self::submit), at most once per
///   drain interval, which delivers whatever has already finished;
/// - a blocking [`drain`](Self::drain), which delivers everything in the
///   order the jobs complete.
///
/// Results are delivered exactly once and every handle is released after
/// its result has been taken, whether the job succeeded or not. A drain
/// that is dropped before it finishes (say, under a caller's timeout)
/// leaves its unfinished jobs in the pending set.
pub struct PooledContext<P, R, M>
where
    P: WorkerPool,
    R: Send + 'static,
{
    pool: P,
    hook: Option<Box<dyn ResultHook<R, M>>>,
    pending: PendingJobs<P, R, M>,
    in_flight: FuturesUnordered<Completion<R, P::Handle<R>, M>>,
    drain_pass: DrainPass,
    drain_interval: Duration,
    last_drain: Instant,
    next_job: u64,
    delivered: u64,
}

impl<P, R, M> PooledContext<P, R, M>
where
    P: WorkerPool,
    R: Send + 'static,
    M: Send + 'static,
{
    /// Wrap a connected pool. The drain interval starts at
    /// [`DrainInterval::DEFAULT`].
    pub fn new(pool: P, hook: Option<Box<dyn ResultHook<R, M>>>) -> Self {
        Self {
            pool,
            hook,
            pending: Vec::new(),
            in_flight: FuturesUnordered::new(),
            drain_pass: DrainPass::default(),
            drain_interval: DrainInterval::DEFAULT.to_std(),
            last_drain: Instant::now(),
            next_job: 0,
            delivered: 0,
        }
    }

    /// Set the minimum time between opportunistic sweeps.
    pub fn with_drain_interval(mut self, interval: impl Into<Duration>) -> Self {
        self.drain_interval = interval.into();
        self
    }

    /// The minimum time between opportunistic sweeps.
    pub fn drain_interval(&self) -> Duration {
        self.drain_interval
    }

    /// The underlying pool.
    pub fn pool(&self) -> &P {
        &self.pool
    }

    /// Number of jobs not yet delivered.
    pub fn pending_len(&self) -> usize {
        self.pending.len() + self.in_flight.len()
    }

    /// Ids of the jobs not yet delivered, in pending-set order.
    pub fn pending_ids(&self) -> Vec<JobId> {
        let mut interrupted: Vec<JobId> = self
            .in_flight
            .iter()
            .filter_map(Completion::job)
            .map(PendingJob::id)
            .collect();
        interrupted.sort_unstable();
        interrupted.extend(self.pending.iter().map(PendingJob::id));
        interrupted
    }

    /// Number of results handed to the hook (or discarded, without one).
    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    /// Remove every pending job, leaving the set empty.
    ///
    /// The caller becomes responsible for the handles; hand them back with
    /// [`process_jobs`](Self::process_jobs).
    pub fn take_pending(&mut self) -> PendingJobs<P, R, M> {
        self.reclaim_in_flight();
        std::mem::take(&mut self.pending)
    }

    /// Dispatch `task(args)` to the pool and record it as pending.
    ///
    /// Never waits on a job. If the drain interval has elapsed since the
    /// last sweep, finished jobs are delivered before returning; a failure
    /// among them is returned here, after the new job has been recorded.
    pub fn submit<F, A>(&mut self, task: F, args: A, metadata: M) -> Result<JobId, ExecError>
    where
        F: Task<A, Output = R>,
        A: Send + 'static,
    {
        let handle = self.pool.submit(task, args)?;
        self.reclaim_in_flight();
        let job = JobId::new(self.next_job);
        self.next_job += 1;
        self.pending.push(PendingJob::new(job, handle, metadata));
        tracing::debug!(job = %job, pending = self.pending.len(), "job submitted");

        if self.last_drain.elapsed() >= self.drain_interval {
            let candidates = self.take_pending();
            let swept = self.sweep_candidates(candidates);
            self.last_drain = Instant::now();
            swept?;
        }
        Ok(job)
    }

    /// Deliver results for a set of jobs.
    ///
    /// - `None`: wait for every pending job and deliver each as it
    ///   completes, leaving the set empty.
    /// - `Some(jobs)`: deliver those of `jobs` that are already finished,
    ///   without waiting. The rest go back into the pending set, ahead of
    ///   anything already there.
    ///
    /// Returns the number of results delivered. If any job or hook fails,
    /// the pass still finishes and the first failure is returned.
    pub async fn process_jobs(
        &mut self,
        jobs: Option<PendingJobs<P, R, M>>,
    ) -> Result<usize, ExecError> {
        match jobs {
            Some(candidates) => self.sweep_candidates(candidates),
            None => self.drain_all().await,
        }
    }

    /// Wait for and deliver every pending job. A no-op when nothing is
    /// pending.
    pub async fn drain(&mut self) -> Result<usize, ExecError> {
        self.process_jobs(None).await
    }

    /// Deliver the pending jobs that are already finished.
    pub fn sweep(&mut self) -> Result<usize, ExecError> {
        let candidates = self.take_pending();
        self.sweep_candidates(candidates)
    }

    /// Drain every pending job, then close the pool.
    ///
    /// The pool is closed even when the drain fails; the drain failure takes
    /// precedence over a close failure.
    pub async fn shutdown(mut self) -> Result<usize, ExecError> {
        tracing::info!(pending = self.pending_len(), "jobs submitted to pool");
        let drained = self.drain().await;
        let delivered = self.delivered;
        let closed = self.pool.close().await;
        tracing::info!(delivered, "pool jobs finished");

        match (drained, closed) {
            (Ok(count), Ok(())) => Ok(count),
            (Ok(_), Err(error)) => Err(error.into()),
            (Err(error), closed) => {
                if let Err(close_error) = closed {
                    tracing::error!(error = %close_error, "failed to close pool after drain failure");
                }
                Err(error)
            }
        }
    }

    fn sweep_candidates(&mut self, candidates: PendingJobs<P, R, M>) -> Result<usize, ExecError> {
        self.reclaim_in_flight();
        let mut requeued = Vec::with_capacity(candidates.len() + self.pending.len());
        let mut pass = DrainPass::default();

        for mut job in candidates {
            if !job.handle.is_done() {
                requeued.push(job);
                continue;
            }
            match (&mut job.handle).now_or_never() {
                Some(result) => {
                    let PendingJob {
                        id,
                        handle,
                        metadata,
                    } = job;
                    handle.release();
                    let outcome = self.deliver(id, metadata, result);
                    pass.record(outcome);
                }
                None => requeued.push(job),
            }
        }

        requeued.append(&mut self.pending);
        self.pending = requeued;
        tracing::debug!(
            delivered = pass.delivered(),
            pending = self.pending.len(),
            "swept pending jobs"
        );
        pass.finish()
    }

    // Jobs stay owned by `self` while the drain waits, and failures already
    // seen are kept in `drain_pass`. Dropping this future mid-way loses
    // neither; the next drain picks both up.
    async fn drain_all(&mut self) -> Result<usize, ExecError> {
        for job in std::mem::take(&mut self.pending) {
            self.in_flight.push(Completion::new(job));
        }
        if self.in_flight.is_empty() {
            return std::mem::take(&mut self.drain_pass).finish();
        }
        tracing::debug!(pending = self.in_flight.len(), "waiting for outstanding jobs");

        loop {
            let Some(done) = self.in_flight.next().await else {
                break;
            };
            let outcome = self.deliver(done.id, done.metadata, done.result);
            self.drain_pass.record(outcome);
        }

        self.last_drain = Instant::now();
        std::mem::take(&mut self.drain_pass).finish()
    }

    /// Move jobs left behind by an interrupted drain back into the pending
    /// set, ahead of anything submitted since.
    fn reclaim_in_flight(&mut self) {
        if self.in_flight.is_empty() {
            return;
        }
        let mut reclaimed: PendingJobs<P, R, M> = std::mem::take(&mut self.in_flight)
            .into_iter()
            .filter_map(Completion::into_job)
            .collect();
        reclaimed.sort_unstable_by_key(PendingJob::id);
        tracing::debug!(reclaimed = reclaimed.len(), "recovered jobs from an interrupted drain");
        reclaimed.append(&mut self.pending);
        self.pending = reclaimed;
    }

    fn deliver(
        &mut self,
        job: JobId,
        metadata: M,
        result: Result<R, TaskError>,
    ) -> Result<(), ExecError> {
        deliver(self.hook.as_deref_mut(), job, metadata, result)?;
        self.delivered += 1;
        Ok(())
    }
}
