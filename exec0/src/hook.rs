//! The Delivery boundary: where completed results leave the context.

use crate::error::HookError;

/// Caller-supplied consumer of completed jobs.
///
/// Invoked exactly once per completed job with the job's result and the
/// metadata attached at submission. Typical hooks persist the manipulated
/// split to storage. The hook owns the result from that point on.
///
/// Closures work directly:
///
/// ```
/// use exec0::{HookError, ResultHook};
///
/// let mut persisted = Vec::new();
/// let mut hook = |edges: u64, split: usize| -> Result<(), HookError> {
///     persisted.push((split, edges));
///     Ok(())
/// };
/// hook.on_result(10, 0).unwrap();
/// assert_eq!(persisted, vec![(0, 10)]);
/// ```
pub trait ResultHook<R, M>: Send {
    /// Consume one completed job.
    fn on_result(&mut self, result: R, metadata: M) -> Result<(), HookError>;
}

impl<R, M, F> ResultHook<R, M> for F
where
    F: FnMut(R, M) -> Result<(), HookError> + Send,
{
    fn on_result(&mut self, result: R, metadata: M) -> Result<(), HookError> {
        self(result, metadata)
    }
}
