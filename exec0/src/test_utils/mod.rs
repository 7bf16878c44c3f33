//! In-memory implementations for testing.
//!
//! Available behind the `test-utils` feature flag. The scripted pool runs
//! tasks on the ambient tokio runtime after a per-submission latency, which
//! makes completion order deterministic under `tokio::time::pause`.

mod recording_hook;
mod scripted_pool;

pub use recording_hook::RecordingHook;
pub use scripted_pool::{ScriptedConnector, ScriptedHandle, ScriptedPool};
