//! In-process execution.

use crate::context::Submission;
use crate::drain::deliver;
use exec0::error::ExecError;
use exec0::hook::ResultHook;
use exec0::id::JobId;
use exec0::task::Task;

/// Runs each task synchronously, in submission order.
///
/// With a hook, the result is handed over before `submit` returns and
/// [`Submission::Delivered`] is reported. Without one, the result itself
/// comes back as [`Submission::Returned`].
pub struct ImmediateContext<R, M> {
    hook: Option<Box<dyn ResultHook<R, M>>>,
    next_job: u64,
}

impl<R, M> ImmediateContext<R, M> {
    /// Create a context delivering to `hook`, if any.
    pub fn new(hook: Option<Box<dyn ResultHook<R, M>>>) -> Self {
        Self { hook, next_job: 0 }
    }

    /// Number of jobs run so far.
    pub fn submitted(&self) -> u64 {
        self.next_job
    }

    /// Run `task(args)` now.
    ///
    /// With a hook installed the result is moved into the hook, so only the
    /// job id comes back ([`Submission::Delivered`]); a hook that needs to
    /// hand the value on can keep a clone. Without a hook the result is
    /// returned as [`Submission::Returned`].
    ///
    /// Task and hook failures are returned unchanged in meaning, tagged
    /// with the job id.
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
        let job = JobId::new(self.next_job);
        self.next_job += 1;
        tracing::debug!(job = %job, "running job in place");

        let result = task.run(args);
        match self.hook.as_deref_mut() {
            Some(hook) => {
                deliver(Some(hook), job, metadata, result)?;
                Ok(Submission::Delivered(job))
            }
            None => result
                .map(Submission::Returned)
                .map_err(|source| ExecError::Task { job, source }),
        }
    }
}
