//! Events, reports, and frame views emitted by the player.

use smallvec::SmallVec;
use std::time::Duration;
use stepview_core::{Highlights, Metrics, ReplayState};

use crate::error::PlaybackError;
use crate::rate::CapKind;

/// Lifecycle of a player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RunState {
    /// Not started or reset.
    #[default]
    Idle,
    /// Advancing on every tick.
    Running,
    /// Holding position.
    Paused,
    /// Reached the end of the run, normally or through a fatal error.
    Finished,
}

/// Why a run finished.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Termination {
    /// The source was exhausted and the cursor reached the end of the log.
    Completed { operations: usize, metrics: Metrics },
    /// A fatal error ended the run.
    Failed(PlaybackError),
}

impl Termination {
    /// Whether the run ended on an error.
    pub fn is_failure(&self) -> bool {
        matches!(self, Termination::Failed(_))
    }
}

/// Deferred work reported when a cap stops a tick short.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Backpressure {
    /// Operations that were due this tick.
    pub due: u64,
    /// Operations actually advanced.
    pub advanced: u64,
    /// `due - advanced`, carried over to later ticks.
    pub shortfall: u64,
    pub reason: CapKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlayerEvent {
    Started { index: usize },
    Paused { index: usize },
    Stepped { index: usize, forward: bool },
    Seeked { index: usize },
    FpsChanged { fps: u32 },
    Backpressure(Backpressure),
    BackpressureCleared,
    /// Terminal signal. Emitted once per run.
    Finished(Termination),
    Reset,
}

pub type Events = SmallVec<[PlayerEvent; 4]>;

/// Result of one [`Player::tick`](crate::Player::tick).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Operations advanced during the tick.
    pub advanced: u64,
    /// Operations that were due during the tick.
    pub due: u64,
    pub events: Events,
}

impl TickReport {
    /// The termination signalled during this tick, if any.
    pub fn finished(&self) -> Option<&Termination> {
        self.events.iter().find_map(|event| match event {
            PlayerEvent::Finished(termination) => Some(termination),
            _ => None,
        })
    }

    /// The backpressure signalled during this tick, if any.
    pub fn backpressure(&self) -> Option<&Backpressure> {
        self.events.iter().find_map(|event| match event {
            PlayerEvent::Backpressure(bp) => Some(bp),
            _ => None,
        })
    }
}

/// Read-only view handed to frame sinks after every advance.
#[derive(Clone, Copy, Debug)]
pub struct FrameView<'a> {
    pub state: &'a ReplayState,
    pub metrics: Metrics,
    pub current_index: usize,
    pub total: Option<usize>,
    pub logical_elapsed: Duration,
    pub wall_elapsed: Duration,
}

impl<'a> FrameView<'a> {
    /// Array values at the current index.
    pub fn values(&self) -> &'a [i64] {
        self.state.values()
    }

    /// Highlights derived from the prefix.
    pub fn highlights(&self) -> &'a Highlights {
        self.state.highlights()
    }

    /// Comparisons so far.
    pub fn comparisons(&self) -> u64 {
        self.metrics.comparisons
    }

    /// Swaps so far.
    pub fn swaps(&self) -> u64 {
        self.metrics.swaps
    }

    /// Fraction of the known total that has been replayed.
    pub fn progress(&self) -> Option<f32> {
        self.total.map(|total| {
            if total == 0 {
                1.0
            } else {
                self.current_index as f32 / total as f32
            }
        })
    }
}

/// Consumer of frames, e.g. a renderer.
pub trait FrameSink {
    fn on_frame(&mut self, frame: &FrameView<'_>);
}

impl<F> FrameSink for F
where
    F: FnMut(&FrameView<'_>),
{
    fn on_frame(&mut self, frame: &FrameView<'_>) {
        self(frame)
    }
}

/// Owned copy of a player's observable state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaybackSnapshot {
    pub run_state: RunState,
    pub current_index: usize,
    pub log_len: usize,
    pub total: Option<usize>,
    pub values: Vec<i64>,
    pub metrics: Metrics,
    pub frames_per_second: u32,
    pub logical_elapsed: Duration,
    pub wall_elapsed: Duration,
}
