//! Replay engine.
//!
//! Reconstruction is a pure function of an initial state and a slice of the
//! log. Every operation goes through one interpretation table ([`apply`]);
//! seeking composes that table with the nearest checkpoint.

use crate::checkpoint::CheckpointStore;
use crate::error::{ReplayError, Result};
use crate::log::OperationLog;
use crate::operation::{OpKind, Operation, Payload};
use crate::state::{Metrics, ReplayState};

/// State and counters produced by a reconstruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reconstruction {
    pub state: ReplayState,
    pub metrics: Metrics,
}

/// Apply one operation to `state`, updating `metrics`.
///
/// Fails with `MalformedOperation` if any position lies outside the array;
/// in that case `state` and `metrics` are left untouched.
pub fn apply(state: &mut ReplayState, metrics: &mut Metrics, op: &Operation) -> Result<()> {
    let len = state.len();
    let positions = op.positions();
    if let Some(&bad) = positions.iter().find(|&&p| p >= len) {
        return Err(ReplayError::MalformedOperation {
            kind: op.kind(),
            reason: format!("position {bad} is outside an array of length {len}"),
        });
    }

    let (values, highlights) = state.parts_mut();
    match op.kind() {
        OpKind::Compare => {
            metrics.comparisons += 1;
            highlights.compare = positions.iter().copied().collect();
        }
        OpKind::MergeCompare => {
            let dest = match op.payload() {
                Some(Payload::Scalar(dest)) => {
                    let dest = usize::try_from(dest)
                        .ok()
                        .filter(|&d| d < len)
                        .ok_or_else(|| ReplayError::MalformedOperation {
                            kind: op.kind(),
                            reason: format!("destination {dest} is outside an array of length {len}"),
                        })?;
                    Some((dest, dest))
                }
                _ => None,
            };
            metrics.comparisons += 1;
            highlights.compare = positions.iter().copied().collect();
            highlights.merge = dest;
        }
        OpKind::Swap => {
            let (i, j) = (positions[0], positions[1]);
            metrics.swaps += 1;
            values.swap(i, j);
            highlights.swap = positions.iter().copied().collect();
            highlights.shift = None;
        }
        OpKind::Set => {
            let k = positions[0];
            values[k] = scalar(op)?;
            highlights.merge = Some((k, k));
            highlights.shift = None;
        }
        OpKind::Shift => {
            let k = positions[0];
            values[k] = scalar(op)?;
            highlights.shift = Some(k);
            highlights.merge = None;
        }
        OpKind::Pivot => highlights.pivot = Some(positions[0]),
        OpKind::MergeMark => highlights.merge = Some((positions[0], positions[1])),
        OpKind::Key => highlights.key = positions.first().copied(),
        OpKind::Confirm => {
            metrics.confirms += 1;
            highlights.confirmed.push(positions[0]);
        }
    }
    Ok(())
}

fn scalar(op: &Operation) -> Result<i64> {
    op.payload()
        .and_then(|p| p.as_scalar())
        .ok_or_else(|| ReplayError::MalformedOperation {
            kind: op.kind(),
            reason: "a scalar payload is required".to_string(),
        })
}

/// Apply `ops` in order to a copy of `initial`.
pub fn replay_slice(initial: &ReplayState, ops: &[Operation]) -> Result<Reconstruction> {
    let mut state = initial.clone();
    let mut metrics = Metrics::default();
    for op in ops {
        apply(&mut state, &mut metrics, op)?;
    }
    Ok(Reconstruction { state, metrics })
}

/// Reconstruct the state reached by applying `[from_index, to_index)` of `log`
/// to `initial_state`.
///
/// The returned metrics count only the operations in the range.
pub fn reconstruct(
    initial_state: &ReplayState,
    log: &OperationLog,
    from_index: usize,
    to_index: usize,
) -> Result<Reconstruction> {
    let ops = log.range(from_index..to_index)?;
    replay_slice(initial_state, ops)
}

/// Reconstruct the state at `target_index` from the nearest checkpoint.
///
/// Metrics are cumulative from index 0.
pub fn seek(
    checkpoints: &CheckpointStore,
    log: &OperationLog,
    target_index: usize,
) -> Result<Reconstruction> {
    if target_index > log.len() {
        return Err(ReplayError::IndexOutOfRange {
            index: target_index,
            len: log.len(),
        });
    }
    let nearest = checkpoints.nearest_at_or_before(target_index)?;
    let delta = reconstruct(&nearest.state, log, nearest.operation_index, target_index)?;
    tracing::trace!(
        target_index,
        checkpoint = nearest.operation_index,
        replayed = target_index - nearest.operation_index,
        "seek"
    );
    Ok(Reconstruction {
        state: delta.state,
        metrics: nearest.metrics + delta.metrics,
    })
}
