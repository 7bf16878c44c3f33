//! Job identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sequence number a context assigns to each submission.
///
/// Ids are unique per context and increase in submission order. They say
/// nothing about completion order; correlate results through the
/// metadata that travels with the job instead.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub u64);

impl JobId {
    /// Create a job id from its sequence number.
    pub const fn new(seq: u64) -> Self {
        Self(seq)
    }

    /// The raw sequence number.
    pub const fn seq(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job-{}", self.0)
    }
}

impl From<u64> for JobId {
    fn from(seq: u64) -> Self {
        Self(seq)
    }
}
