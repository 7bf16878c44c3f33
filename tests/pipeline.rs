//! End-to-end split pipeline: plan, dispatch, persist, resume.
//!
//! A driver plans splits over a small population, submits one task per
//! split, and a hook writes each split's output file. The same driver runs
//! in place and on the local pool, and an interrupted run resumes from the
//! outputs already on disk.

use connectome_exec::{ExecOptions, in_context};
use connectome_pool_local::LocalConnector;
use exec0::error::{ExecError, HookError, TaskError};
use exec0::hook::ResultHook;
use exec0::params::PoolParams;
use exec0::split::{SplitMeta, SplitPlan};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Task and hook
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Stand-in manipulation: one self-edge per node in the split.
fn rewire((meta,): (SplitMeta,)) -> Result<Vec<(u64, u64)>, TaskError> {
    if meta.nodes.start == 13 {
        return Err(TaskError::failed("node 13 has no morphology"));
    }
    Ok(meta.nodes.clone().map(|n| (n, n)).collect())
}

/// Writes each split's edges as JSON and remembers the write order.
struct EdgeWriter {
    dir: PathBuf,
    written: Arc<Mutex<Vec<usize>>>,
}

impl ResultHook<Vec<(u64, u64)>, SplitMeta> for EdgeWriter {
    fn on_result(&mut self, edges: Vec<(u64, u64)>, meta: SplitMeta) -> Result<(), HookError> {
        let body = serde_json::to_vec(&edges).map_err(|e| HookError::Failed(e.to_string()))?;
        fs::write(meta.output_path(&self.dir), body)
            .map_err(|e| HookError::Failed(e.to_string()))?;
        self.written
            .lock()
            .map_err(|e| HookError::Failed(e.to_string()))?
            .push(meta.index);
        Ok(())
    }
}

async fn run_splits(
    options: &ExecOptions,
    dir: &Path,
    splits: Vec<SplitMeta>,
) -> Result<Vec<usize>, ExecError> {
    let written = Arc::new(Mutex::new(Vec::new()));
    let hook: Box<dyn ResultHook<Vec<(u64, u64)>, SplitMeta>> = Box::new(EdgeWriter {
        dir: dir.to_path_buf(),
        written: Arc::clone(&written),
    });

    in_context(
        options,
        &LocalConnector,
        Some(hook),
        async |ctx| -> Result<(), ExecError> {
            for meta in splits {
                ctx.submit(rewire, (meta.clone(),), meta)?;
            }
            Ok(())
        },
    )
    .await?;

    let mut written = written.lock().unwrap().clone();
    written.sort_unstable();
    Ok(written)
}

fn read_edges(dir: &Path, meta: &SplitMeta) -> Vec<(u64, u64)> {
    serde_json::from_slice(&fs::read(meta.output_path(dir)).unwrap()).unwrap()
}

fn pooled() -> ExecOptions {
    ExecOptions::parallel(PoolParams::parse_pairs(["n_workers=3"]).unwrap())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Serial and pooled runs agree
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn serial_and_pooled_runs_write_identical_outputs() {
    let plan = SplitPlan::new(10, 4).unwrap();
    let serial_dir = tempfile::tempdir().unwrap();
    let pooled_dir = tempfile::tempdir().unwrap();

    let serial = run_splits(&ExecOptions::serial(), serial_dir.path(), plan.iter().collect())
        .await
        .unwrap();
    let pooled = run_splits(&pooled(), pooled_dir.path(), plan.iter().collect())
        .await
        .unwrap();

    assert_eq!(serial, vec![0, 1, 2, 3]);
    assert_eq!(pooled, serial);
    for meta in plan.iter() {
        let edges = read_edges(pooled_dir.path(), &meta);
        assert_eq!(edges.len() as u64, meta.node_count());
        assert_eq!(edges, read_edges(serial_dir.path(), &meta));
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Resume
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn resume_only_runs_missing_splits() {
    let plan = SplitPlan::new(12, 6).unwrap();
    let dir = tempfile::tempdir().unwrap();

    run_splits(&pooled(), dir.path(), plan.iter().collect())
        .await
        .unwrap();
    for index in [1, 4] {
        let meta = plan.get(index).unwrap();
        fs::remove_file(meta.output_path(dir.path())).unwrap();
    }

    let remaining = plan.remaining(dir.path());
    assert_eq!(
        remaining.iter().map(|m| m.index).collect::<Vec<_>>(),
        vec![1, 4]
    );
    let rerun = run_splits(&pooled(), dir.path(), remaining).await.unwrap();
    assert_eq!(rerun, vec![1, 4]);
    assert!(plan.remaining(dir.path()).is_empty());
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// A failing split
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn failing_split_leaves_other_outputs_for_resume() {
    // 26 nodes in 2 splits: the second split starts at node 13.
    let plan = SplitPlan::new(26, 2).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let splits = plan.iter().collect::<Vec<_>>();
    assert_eq!(splits[1].nodes.start, 13);

    let err = run_splits(&pooled(), dir.path(), splits).await.unwrap_err();
    assert!(matches!(err, ExecError::Task { .. }));
    assert!(err.to_string().contains("no morphology"));

    let remaining = plan.remaining(dir.path());
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].index, 1);
}
