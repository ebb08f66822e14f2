//! A single run: source, log, checkpoints, and a replay cursor.
//!
//! The session owns every mutable piece of a run exclusively. The cursor can
//! move anywhere in `[0, log.len()]`; moving past the end of the log pulls
//! from the source, which grows the log and the checkpoint store together.

use crate::checkpoint::CheckpointStore;
use crate::error::{ReplayError, Result};
use crate::log::OperationLog;
use crate::replay::{self, Reconstruction};
use crate::source::Source;
use crate::state::{Metrics, ReplayState};

/// Outcome of moving the cursor forward by one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    /// Re-applied an operation already in the log.
    Replayed,
    /// Pulled a new operation from the source and appended it.
    Pulled,
    /// The cursor is at the end of the log and the source is done.
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceStatus {
    Live,
    Exhausted,
    Failed,
}

pub struct RunSession {
    initial: ReplayState,
    log: OperationLog,
    checkpoints: CheckpointStore,
    source: Box<dyn Source>,
    status: SourceStatus,
    cursor: usize,
    state: ReplayState,
    metrics: Metrics,
}

impl RunSession {
    /// A session over `source`, with the index-0 checkpoint captured.
    pub fn new(initial: ReplayState, source: Box<dyn Source>, stride: usize) -> Self {
        let mut checkpoints = CheckpointStore::new(stride);
        checkpoints.capture_initial(&initial);
        let capacity = source.total_len().unwrap_or(0);
        Self {
            state: initial.clone(),
            initial,
            log: OperationLog::with_capacity(capacity),
            checkpoints,
            source,
            status: SourceStatus::Live,
            cursor: 0,
            metrics: Metrics::default(),
        }
    }

    /// State before any operation.
    pub fn initial(&self) -> &ReplayState {
        &self.initial
    }

    /// Operations pulled so far.
    pub fn log(&self) -> &OperationLog {
        &self.log
    }

    /// Snapshots taken while recording.
    pub fn checkpoints(&self) -> &CheckpointStore {
        &self.checkpoints
    }

    /// Number of operations applied to the current state.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// State at the current position.
    pub fn state(&self) -> &ReplayState {
        &self.state
    }

    /// Metrics at the current position.
    pub fn metrics(&self) -> Metrics {
        self.metrics
    }

    /// Total run length, if the source declared it or is already exhausted.
    pub fn total_len(&self) -> Option<usize> {
        match self.status {
            SourceStatus::Live => self.source.total_len(),
            SourceStatus::Exhausted | SourceStatus::Failed => Some(self.log.len()),
        }
    }

    /// Whether the source reported its total length.
    pub fn has_known_total_len(&self) -> bool {
        self.source.total_len().is_some()
    }

    /// Whether the source has nothing more to give.
    pub fn source_done(&self) -> bool {
        match self.status {
            SourceStatus::Live => self
                .source
                .total_len()
                .is_some_and(|total| self.log.len() >= total),
            SourceStatus::Exhausted | SourceStatus::Failed => true,
        }
    }

    /// Whether the source has raised.
    pub fn source_failed(&self) -> bool {
        self.status == SourceStatus::Failed
    }

    /// Whether the cursor sits at the end of a finished stream.
    pub fn at_end(&self) -> bool {
        self.cursor == self.log.len() && self.source_done()
    }

    /// Move the cursor forward by one operation.
    ///
    /// A source failure or a malformed pulled operation is fatal: the source
    /// is dropped from further pulls and the error is returned.
    pub fn advance(&mut self) -> Result<Advance> {
        if self.cursor < self.log.len() {
            let op = self.log.get(self.cursor)?;
            replay::apply(&mut self.state, &mut self.metrics, op)?;
            self.cursor += 1;
            return Ok(Advance::Replayed);
        }

        if self.source_done() {
            self.status = match self.status {
                SourceStatus::Live => SourceStatus::Exhausted,
                other => other,
            };
            return Ok(Advance::Exhausted);
        }

        match self.source.next_op() {
            Ok(Some(op)) => {
                if let Err(err) = replay::apply(&mut self.state, &mut self.metrics, &op) {
                    tracing::error!(index = self.log.len(), %err, "source produced a malformed operation");
                    self.status = SourceStatus::Failed;
                    return Err(err);
                }
                self.log.append(op);
                self.cursor += 1;
                self.checkpoints
                    .maybe_capture(&self.log, &self.state, self.metrics);
                Ok(Advance::Pulled)
            }
            Ok(None) => {
                tracing::debug!(len = self.log.len(), "source exhausted");
                self.status = SourceStatus::Exhausted;
                Ok(Advance::Exhausted)
            }
            Err(err) => {
                tracing::warn!(index = self.log.len(), %err, "source failed");
                self.status = SourceStatus::Failed;
                Err(ReplayError::SourceFailure(err))
            }
        }
    }

    /// Move the cursor to `target` (at most `log.len()`) via the nearest checkpoint.
    pub fn seek(&mut self, target: usize) -> Result<()> {
        let Reconstruction { state, metrics } = replay::seek(&self.checkpoints, &self.log, target)?;
        self.state = state;
        self.metrics = metrics;
        self.cursor = target;
        Ok(())
    }

    /// Move the cursor back by one. Returns `false` at index 0.
    pub fn retreat(&mut self) -> Result<bool> {
        match self.cursor.checked_sub(1) {
            Some(target) => {
                self.seek(target)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Discard the log and checkpoints and start over with a fresh source.
    pub fn reset(&mut self, source: Box<dyn Source>) {
        self.log.clear();
        self.checkpoints.capture_initial(&self.initial);
        self.source = source;
        self.status = SourceStatus::Live;
        self.cursor = 0;
        self.state = self.initial.clone();
        self.metrics = Metrics::default();
    }
}

impl std::fmt::Debug for RunSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunSession")
            .field("cursor", &self.cursor)
            .field("log_len", &self.log.len())
            .field("checkpoints", &self.checkpoints.len())
            .field("status", &self.status)
            .field("metrics", &self.metrics)
            .finish()
    }
}
