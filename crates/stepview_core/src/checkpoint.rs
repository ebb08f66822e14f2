//! Periodic snapshots of reconstructed state.
//!
//! A snapshot every `stride` operations bounds seek cost to at most
//! `stride - 1` replayed operations, at `len / stride` snapshots of memory.

use crate::error::{ReplayError, Result};
use crate::log::OperationLog;
use crate::state::{Metrics, ReplayState};

/// Default interval, in operations, between checkpoints.
pub const DEFAULT_STRIDE: usize = 200;

/// Snapshot of a run at `operation_index`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Checkpoint {
    pub operation_index: usize,
    pub state: ReplayState,
    pub metrics: Metrics,
}

impl Checkpoint {
    /// Comparisons made before this checkpoint.
    pub fn comparisons(&self) -> u64 {
        self.metrics.comparisons
    }

    /// Swaps made before this checkpoint.
    pub fn swaps(&self) -> u64 {
        self.metrics.swaps
    }
}

/// Checkpoints ordered by strictly increasing `operation_index`.
#[derive(Clone, Debug)]
pub struct CheckpointStore {
    stride: usize,
    checkpoints: Vec<Checkpoint>,
}

impl CheckpointStore {
    /// Create an empty store. A zero stride is treated as 1.
    pub fn new(stride: usize) -> Self {
        Self {
            stride: stride.max(1),
            checkpoints: Vec::new(),
        }
    }

    /// Operations between checkpoints.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Discard all checkpoints and record `initial` as the index-0 checkpoint.
    pub fn capture_initial(&mut self, initial: &ReplayState) {
        self.checkpoints.clear();
        self.checkpoints.push(Checkpoint {
            operation_index: 0,
            state: initial.clone(),
            metrics: Metrics::default(),
        });
    }

    /// Capture `state` if the log has just reached a stride boundary.
    ///
    /// Call after every append with the state and cumulative metrics at
    /// `log.len()`. Returns whether a checkpoint was taken.
    pub fn maybe_capture(&mut self, log: &OperationLog, state: &ReplayState, metrics: Metrics) -> bool {
        let index = log.len();
        if index % self.stride != 0 {
            return false;
        }
        if self
            .checkpoints
            .last()
            .is_some_and(|last| last.operation_index >= index)
        {
            return false;
        }

        tracing::trace!(index, stride = self.stride, "checkpoint captured");
        self.checkpoints.push(Checkpoint {
            operation_index: index,
            state: state.clone(),
            metrics,
        });
        true
    }

    /// The checkpoint with the greatest `operation_index <= target_index`.
    pub fn nearest_at_or_before(&self, target_index: usize) -> Result<&Checkpoint> {
        let after = self
            .checkpoints
            .partition_point(|c| c.operation_index <= target_index);
        after
            .checked_sub(1)
            .and_then(|i| self.checkpoints.get(i))
            .ok_or(ReplayError::NoCheckpointAvailable {
                target: target_index,
            })
    }

    /// Number of checkpoints held.
    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    /// Checkpoints in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Checkpoint> {
        self.checkpoints.iter()
    }

    /// Drop every checkpoint, including index 0.
    pub fn clear(&mut self) {
        self.checkpoints.clear();
    }
}

impl Default for CheckpointStore {
    fn default() -> Self {
        Self::new(DEFAULT_STRIDE)
    }
}
