//! Splitting a connectome into independent units of work.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::path::{Path, PathBuf};

/// Pick the number of splits, letting an explicit request override the
/// configured value. Defaults to a single split.
pub fn resolve_split_count(configured: Option<usize>, requested: Option<usize>) -> usize {
    match (configured, requested) {
        (Some(configured), Some(requested)) => {
            if configured != requested {
                tracing::warn!(
                    configured,
                    requested,
                    "overriding configured split count with requested value"
                );
            }
            requested
        }
        (None, Some(requested)) => requested,
        (Some(configured), None) => configured,
        (None, None) => 1,
    }
}

/// Partition of node ids `0..node_count` into contiguous blocks.
///
/// Blocks differ in size by at most one node; the first
/// `node_count % splits` blocks carry the extra node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitPlan {
    node_count: u64,
    splits: usize,
}

impl SplitPlan {
    /// Plan `splits` blocks over `node_count` nodes.
    ///
    /// Asking for more blocks than there are nodes yields one block per
    /// node (and a single empty block for an empty population).
    pub fn new(node_count: u64, splits: usize) -> Result<Self, ConfigError> {
        if splits == 0 {
            return Err(ConfigError::InvalidSplits(
                "at least one split is required".into(),
            ));
        }
        let most = usize::try_from(node_count.max(1)).unwrap_or(usize::MAX);
        let effective = if splits > most {
            tracing::debug!(splits, node_count, "more splits than nodes, clamping");
            most
        } else {
            splits
        };
        Ok(Self {
            node_count,
            splits: effective,
        })
    }

    /// Total number of nodes covered.
    pub fn node_count(&self) -> u64 {
        self.node_count
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.splits
    }

    /// Always false; a plan has at least one block.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Metadata for block `index`, if it exists.
    pub fn get(&self, index: usize) -> Option<SplitMeta> {
        (index < self.splits).then(|| SplitMeta {
            index,
            total: self.splits,
            nodes: self.bounds(index),
        })
    }

    /// All blocks in index order.
    pub fn iter(&self) -> impl Iterator<Item = SplitMeta> + use<> {
        let plan = *self;
        (0..plan.splits).filter_map(move |index| plan.get(index))
    }

    /// Blocks whose output under `dir` does not exist yet.
    ///
    /// Used to resume an interrupted run without recomputing finished
    /// splits.
    pub fn remaining(&self, dir: &Path) -> Vec<SplitMeta> {
        let remaining: Vec<SplitMeta> = self
            .iter()
            .filter(|split| !split.output_path(dir).exists())
            .collect();
        tracing::debug!(
            total = self.splits,
            skipped = self.splits - remaining.len(),
            "resuming from existing split outputs"
        );
        remaining
    }

    fn bounds(&self, index: usize) -> Range<u64> {
        let splits = self.splits as u64;
        let i = index as u64;
        let base = self.node_count / splits;
        let extra = self.node_count % splits;
        let start = i * base + i.min(extra);
        let len = base + u64::from(i < extra);
        start..start + len
    }
}

/// Metadata travelling with one split's job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SplitMeta {
    /// Block index, `0..total`.
    pub index: usize,
    /// Number of blocks in the plan.
    pub total: usize,
    /// Node ids covered by this block.
    pub nodes: Range<u64>,
}

impl SplitMeta {
    /// Where this split's edges are written under `dir`.
    pub fn output_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("edges.{}.parquet", self.index))
    }

    /// Number of nodes in the block.
    pub fn node_count(&self) -> u64 {
        self.nodes.end - self.nodes.start
    }
}
