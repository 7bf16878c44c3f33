//! Opportunistic drain interval.
//!
//! [`DrainInterval`] serializes as a plain integer (milliseconds), the same
//! stable format used for every duration in configuration files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How often a pooled context sweeps its pending jobs while submitting.
///
/// The sweep only happens on the submission path and only when at least
/// this much wall-clock time has passed since the previous sweep. It never
/// waits on a job, so a short interval costs CPU but never latency.
///
/// # Examples
///
/// ```
/// use exec0::DrainInterval;
///
/// assert_eq!(DrainInterval::default().as_millis(), 60_000);
///
/// let every_second = DrainInterval::from_secs(1);
/// let json = serde_json::to_string(&every_second).unwrap();
/// assert_eq!(json, "1000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrainInterval(u64);

impl DrainInterval {
    /// One minute.
    pub const DEFAULT: Self = Self(60_000);

    /// Sweep on every submission.
    pub const ALWAYS: Self = Self(0);

    /// Create from milliseconds.
    pub const fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    /// Create from seconds.
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs.saturating_mul(1000))
    }

    /// The interval in milliseconds.
    pub const fn as_millis(&self) -> u64 {
        self.0
    }

    /// Convert to `std::time::Duration`.
    pub const fn to_std(&self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl Default for DrainInterval {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<Duration> for DrainInterval {
    fn from(d: Duration) -> Self {
        Self(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }
}

impl From<DrainInterval> for Duration {
    fn from(d: DrainInterval) -> Self {
        d.to_std()
    }
}

impl std::fmt::Display for DrainInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}ms", self.0)
    }
}
