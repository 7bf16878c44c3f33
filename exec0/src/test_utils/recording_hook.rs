//! RecordingHook: keeps every delivered `(result, metadata)` pair.

use crate::error::HookError;
use crate::hook::ResultHook;
use std::sync::{Arc, Mutex};

/// A result hook that records deliveries in order.
///
/// Clones share the same record, so keep one for assertions and box
/// another into the context.
pub struct RecordingHook<R, M> {
    records: Arc<Mutex<Vec<(R, M)>>>,
}

impl<R, M> RecordingHook<R, M> {
    /// Create a hook with an empty record.
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of deliveries so far.
    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or_default()
    }

    /// Whether nothing has been delivered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<R: Clone, M: Clone> RecordingHook<R, M> {
    /// Snapshot of the deliveries, in delivery order.
    pub fn records(&self) -> Vec<(R, M)> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Snapshot of the delivered metadata, in delivery order.
    pub fn metadata(&self) -> Vec<M> {
        self.records()
            .into_iter()
            .map(|(_, metadata)| metadata)
            .collect()
    }
}

impl<R, M> Clone for RecordingHook<R, M> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
        }
    }
}

impl<R, M> Default for RecordingHook<R, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Send, M: Send> ResultHook<R, M> for RecordingHook<R, M> {
    fn on_result(&mut self, result: R, metadata: M) -> Result<(), HookError> {
        self.records
            .lock()
            .map_err(|e| HookError::Failed(e.to_string()))?
            .push((result, metadata));
        Ok(())
    }
}
