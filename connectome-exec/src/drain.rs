//! Result delivery shared by both contexts.

use exec0::error::{ExecError, TaskError};
use exec0::hook::ResultHook;
use exec0::id::JobId;

/// Hand one job's outcome to the hook.
///
/// A failed task is returned as an error and never reaches the hook.
pub(crate) fn deliver<R, M, H>(
    hook: Option<&mut H>,
    job: JobId,
    metadata: M,
    result: Result<R, TaskError>,
) -> Result<(), ExecError>
where
    H: ResultHook<R, M> + ?Sized,
{
    let value = result.map_err(|source| ExecError::Task { job, source })?;
    if let Some(hook) = hook {
        hook.on_result(value, metadata)
            .map_err(|source| ExecError::Hook { job, source })?;
    }
    Ok(())
}

/// Bookkeeping for one drain or sweep pass.
///
/// A pass keeps going after a failure so that every completed handle is
/// delivered and released; the first failure is what the pass returns.
#[derive(Default)]
pub(crate) struct DrainPass {
    delivered: usize,
    failures: usize,
    first_error: Option<ExecError>,
}

impl DrainPass {
    pub(crate) fn record(&mut self, outcome: Result<(), ExecError>) {
        match outcome {
            Ok(()) => self.delivered += 1,
            Err(error) => {
                tracing::error!(error = %error, job = ?error.job(), "job failed during drain");
                self.failures += 1;
                if self.first_error.is_none() {
                    self.first_error = Some(error);
                }
            }
        }
    }

    pub(crate) fn delivered(&self) -> usize {
        self.delivered
    }

    pub(crate) fn finish(self) -> Result<usize, ExecError> {
        match self.first_error {
            Some(error) => {
                if self.failures > 1 {
                    tracing::warn!(
                        failures = self.failures,
                        delivered = self.delivered,
                        "several jobs failed in one pass, reporting the first"
                    );
                }
                Err(error)
            }
            None => Ok(self.delivered),
        }
    }
}
