//! The Task boundary: one split's computation.

use crate::error::TaskError;

/// A unit of work: consumes its positional arguments and produces a result.
///
/// Tasks are expected to be referentially transparent with respect to their
/// arguments (the split plus manipulation parameters), which is what makes
/// it safe to run them in-process or on any worker.
///
/// Arguments are a single value; use a tuple for several positional ones.
/// Every `FnOnce(A) -> Result<T, TaskError>` is a task:
///
/// ```
/// use exec0::{Task, TaskError};
///
/// let scale = |(values, factor): (Vec<u32>, u32)| -> Result<Vec<u32>, TaskError> {
///     Ok(values.into_iter().map(|v| v * factor).collect())
/// };
/// assert_eq!(scale.run((vec![1, 2], 3)).unwrap(), vec![3, 6]);
/// ```
pub trait Task<A>: Send + 'static {
    /// What the task produces on success.
    type Output: Send + 'static;

    /// Run the task to completion on the current thread.
    fn run(self, args: A) -> Result<Self::Output, TaskError>;
}

impl<F, A, T> Task<A> for F
where
    F: FnOnce(A) -> Result<T, TaskError> + Send + 'static,
    T: Send + 'static,
{
    type Output = T;

    fn run(self, args: A) -> Result<T, TaskError> {
        self(args)
    }
}
