//! Error types for each boundary.

use crate::id::JobId;
use thiserror::Error;

/// Failures raised by a task while processing its split.
///
/// The pool captures these and re-surfaces them when the job's handle is
/// drained. Nothing in this crate retries a failed task.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum TaskError {
    /// The task ran and reported a failure.
    #[error("task failed: {0}")]
    Failed(String),

    /// The task panicked on its worker.
    #[error("task panicked: {0}")]
    Panicked(String),

    /// The task never ran to completion because its worker went away.
    #[error("task cancelled: {0}")]
    Cancelled(String),

    /// Catch-all. Include context.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl TaskError {
    /// Shorthand for [`TaskError::Failed`].
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Worker pool errors.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum PoolError {
    /// The pool could not be reached or started.
    #[error("pool connection failed: {0}")]
    ConnectFailed(String),

    /// The pool refused a submission.
    #[error("submission rejected: {0}")]
    SubmitFailed(String),

    /// The pool was already closed.
    #[error("pool is closed")]
    Closed,

    /// Catch-all.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Configuration errors, surfaced before any job is submitted.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A parameter that must be numeric holds something else.
    #[error("parameter {key} must be numeric, got {value:?}")]
    NotNumeric {
        /// Parameter name.
        key: String,
        /// Offending value as written.
        value: String,
    },

    /// A numeric parameter is outside the accepted range.
    #[error("parameter {key} out of range: {message}")]
    OutOfRange {
        /// Parameter name.
        key: String,
        /// What the accepted range is.
        message: String,
    },

    /// A `key=value` pair could not be split.
    #[error("malformed parameter {0:?}, expected key=value")]
    MalformedPair(String),

    /// The number of splits is unusable.
    #[error("invalid split count: {0}")]
    InvalidSplits(String),

    /// The configuration document could not be parsed.
    #[error("configuration parse error: {0}")]
    Parse(String),

    /// Catch-all.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Result hook errors, e.g. a split that could not be persisted.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum HookError {
    /// The hook failed to consume a result.
    #[error("result hook failed: {0}")]
    Failed(String),

    /// Catch-all.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Everything an execution context can hand back to its driver.
///
/// None of these are recovered locally: the driver decides whether one
/// failed split aborts the run.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ExecError {
    /// A job's task failed.
    #[error("{job} failed: {source}")]
    Task {
        /// The job whose task failed.
        job: JobId,
        /// What the task reported.
        #[source]
        source: TaskError,
    },

    /// The result hook rejected a job's result.
    #[error("{job} result not delivered: {source}")]
    Hook {
        /// The job whose result was being delivered.
        job: JobId,
        /// What the hook reported.
        #[source]
        source: HookError,
    },

    /// The worker pool failed.
    #[error("pool error: {0}")]
    Pool(#[from] PoolError),

    /// The execution configuration is unusable.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ExecError {
    /// The job this error is attributed to, if any.
    pub fn job(&self) -> Option<JobId> {
        match self {
            Self::Task { job, .. } | Self::Hook { job, .. } => Some(*job),
            _ => None,
        }
    }
}
