use connectome_pool_local::{LocalConnector, LocalPool};
use exec0::error::{ConfigError, PoolError, TaskError};
use exec0::handle::JobHandle;
use exec0::params::PoolParams;
use exec0::pool::{PoolConnector, WorkerPool};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

fn double((value,): (u64,)) -> Result<u64, TaskError> {
    Ok(value * 2)
}

// --- Submission ---

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn submitted_job_resolves_to_task_output() {
    let pool = LocalPool::new(2).unwrap();
    let handle = pool.submit(double, (21,)).unwrap();
    assert_eq!(handle.await.unwrap(), 42);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn submit_returns_before_job_finishes() {
    let pool = LocalPool::new(1).unwrap();
    let (tx, rx) = std::sync::mpsc::channel::<()>();
    let handle = pool
        .submit(
            move |()| -> Result<&'static str, TaskError> {
                rx.recv().map_err(|e| TaskError::failed(e.to_string()))?;
                Ok("released")
            },
            (),
        )
        .unwrap();

    assert!(!handle.is_done());
    tx.send(()).unwrap();
    assert_eq!(handle.await.unwrap(), "released");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn is_done_after_completion() {
    let pool = LocalPool::new(1).unwrap();
    let handle = pool.submit(double, (1,)).unwrap();
    while !handle.is_done() {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    assert_eq!(handle.await.unwrap(), 2);
}

// --- Failures ---

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn task_error_is_surfaced_through_handle() {
    let pool = LocalPool::new(1).unwrap();
    let handle = pool
        .submit(
            |()| -> Result<u64, TaskError> { Err(TaskError::failed("bad split")) },
            (),
        )
        .unwrap();
    let err = handle.await.unwrap_err();
    assert!(matches!(err, TaskError::Failed(ref m) if m == "bad split"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn panic_becomes_task_error_with_message() {
    let pool = LocalPool::new(1).unwrap();
    let handle = pool
        .submit(
            |()| -> Result<u64, TaskError> { panic!("edge table corrupt") },
            (),
        )
        .unwrap();
    let err = handle.await.unwrap_err();
    assert!(matches!(err, TaskError::Panicked(ref m) if m.contains("edge table corrupt")));
}

// --- Concurrency limit ---

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn never_runs_more_than_worker_count_at_once() {
    let pool = LocalPool::new(2).unwrap();
    let running = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let running = Arc::clone(&running);
            let peak = Arc::clone(&peak);
            pool.submit(
                move |()| -> Result<usize, TaskError> {
                    let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    std::thread::sleep(Duration::from_millis(20));
                    running.fetch_sub(1, Ordering::SeqCst);
                    Ok(i)
                },
                (),
            )
            .unwrap()
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.await.unwrap(), i);
    }
    assert!(peak.load(Ordering::SeqCst) <= 2);
}

// --- Lifecycle ---

#[test]
fn creating_pool_outside_runtime_fails() {
    let err = LocalPool::new(1).err().unwrap();
    assert!(matches!(err, PoolError::ConnectFailed(_)));
}

#[tokio::test]
async fn close_succeeds() {
    let pool = LocalPool::new(1).unwrap();
    pool.close().await.unwrap();
}

// --- Connector ---

#[tokio::test]
async fn connector_reads_worker_count_and_name() {
    let params = PoolParams::parse_pairs(["n_workers=3", "name=splits"])
        .unwrap()
        .normalize();
    let settings = LocalConnector.configure(&params).unwrap();
    assert_eq!(settings.workers, 3);
    assert_eq!(settings.name, "splits");

    let pool = LocalConnector.connect(settings).await.unwrap();
    assert_eq!(pool.workers(), 3);
    assert_eq!(pool.name(), "splits");
}

#[test]
fn connector_defaults_to_available_parallelism() {
    let settings = LocalConnector.configure(&PoolParams::new().normalize()).unwrap();
    assert!(settings.workers >= 1);
    assert_eq!(settings.name, "local");
}

#[test]
fn connector_rejects_non_numeric_worker_count() {
    let params = PoolParams::new().with("n_workers", "eight").normalize();
    let err = LocalConnector.configure(&params).unwrap_err();
    assert!(matches!(err, ConfigError::NotNumeric { .. }));
}

#[test]
fn connector_rejects_zero_workers() {
    let params = PoolParams::new().with("n_workers", "0").normalize();
    let err = LocalConnector.configure(&params).unwrap_err();
    assert!(matches!(err, ConfigError::OutOfRange { ref key, .. } if key == "n_workers"));
}

#[test]
fn connector_ignores_unknown_keys() {
    let params = PoolParams::parse_pairs(["scheduler_file=/tmp/scheduler.json", "n_workers=2"])
        .unwrap()
        .normalize();
    let settings = LocalConnector.configure(&params).unwrap();
    assert_eq!(settings.workers, 2);
}
