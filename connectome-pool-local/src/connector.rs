//! Opening a [`LocalPool`] from connection parameters.

use crate::LocalPool;
use async_trait::async_trait;
use exec0::error::{ConfigError, PoolError};
use exec0::params::NormalizedParams;
use exec0::pool::PoolConnector;
use std::num::NonZeroUsize;
use tokio::sync::Semaphore;

const KNOWN_KEYS: &[&str] = &["n_workers", "name"];

/// Settings understood by the local pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalSettings {
    /// Maximum number of tasks running at once.
    pub workers: usize,
    /// Label used in log events.
    pub name: String,
}

impl Default for LocalSettings {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            name: "local".to_owned(),
        }
    }
}

/// Connector for [`LocalPool`].
///
/// Recognized parameters:
/// - `n_workers`: integer, at least 1 (default: available parallelism)
/// - `name`: label for log events
///
/// Anything else is logged and ignored, so a parameter set written for a
/// cluster pool still runs locally.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalConnector;

#[async_trait]
impl PoolConnector for LocalConnector {
    type Settings = LocalSettings;
    type Pool = LocalPool;

    fn configure(&self, params: &NormalizedParams) -> Result<LocalSettings, ConfigError> {
        for (key, value) in params.iter() {
            if !KNOWN_KEYS.contains(&key) {
                tracing::warn!(key, value = %value, "ignoring parameter not understood by the local pool");
            }
        }

        let mut settings = LocalSettings::default();
        if let Some(workers) = params.int("n_workers")? {
            settings.workers = usize::try_from(workers)
                .ok()
                .filter(|w| (1..=Semaphore::MAX_PERMITS).contains(w))
                .ok_or_else(|| ConfigError::OutOfRange {
                    key: "n_workers".into(),
                    message: format!("expected at least one worker, got {workers}"),
                })?;
        }
        if let Some(name) = params.text("name") {
            settings.name = name;
        }
        Ok(settings)
    }

    async fn connect(&self, settings: LocalSettings) -> Result<LocalPool, PoolError> {
        let pool = LocalPool::new(settings.workers)?.named(settings.name);
        tracing::info!(pool = %pool.name(), workers = pool.workers(), "local pool started");
        Ok(pool)
    }
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}
