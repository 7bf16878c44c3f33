//! Context selection options.

use exec0::duration::DrainInterval;
use exec0::error::ConfigError;
use exec0::params::PoolParams;
use serde::{Deserialize, Serialize};

/// How a driver wants its tasks executed.
///
/// Every field has a default, so `{}` is a valid (serial) configuration:
///
/// ```
/// use connectome_exec::ExecOptions;
///
/// let options = ExecOptions::from_json(
///     r#"{"parallel": true, "pool": {"n_workers": "4"}, "drain_interval": 5000}"#,
/// ).unwrap();
/// assert!(options.parallel);
/// assert_eq!(options.drain_interval.as_millis(), 5000);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecOptions {
    /// Dispatch to a worker pool instead of running in place.
    pub parallel: bool,
    /// Connection parameters for the pool, as given (before normalization).
    /// Never read when `parallel` is false.
    pub pool: PoolParams,
    /// Minimum time between opportunistic sweeps, in milliseconds.
    pub drain_interval: DrainInterval,
}

impl ExecOptions {
    /// Run in place.
    pub fn serial() -> Self {
        Self::default()
    }

    /// Dispatch to a pool opened with `pool`.
    pub fn parallel(pool: PoolParams) -> Self {
        Self {
            parallel: true,
            pool,
            ..Self::default()
        }
    }

    /// Override the drain interval.
    pub fn with_drain_interval(mut self, interval: impl Into<DrainInterval>) -> Self {
        self.drain_interval = interval.into();
        self
    }

    /// Parse from JSON.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}
