//! Side-by-side comparison of two runs.
//!
//! The controller owns two players built over the same dataset and fans every
//! transport command out to both. The players never wait for each other: a
//! run with fewer operations per frame finishes first and simply stops while
//! the other keeps going. Commands gated on a capability are skipped for a
//! side that lacks it instead of failing the whole broadcast.

use smallvec::SmallVec;
use std::rc::Rc;
use stepview_core::Capability;

use crate::clock::Clock;
use crate::config::{validate_caps, validate_fps, PlayerConfig};
use crate::error::{PlaybackError, Result};
use crate::event::{Events, FrameSink, PlaybackSnapshot, PlayerEvent, RunState, TickReport};
use crate::player::{Player, SinkId, SourceFactory};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    /// Lower-case label for logs.
    pub fn name(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// What a broadcast command did to one side.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Applied(Events),
    /// The side lacks the capability the command needs.
    Skipped { capability: Capability },
    /// The player refused the command; its run is unchanged.
    Rejected(PlaybackError),
}

impl Outcome {
    /// Events emitted by an applied command.
    pub fn events(&self) -> &[PlayerEvent] {
        match self {
            Outcome::Applied(events) => events.as_slice(),
            Outcome::Skipped { .. } | Outcome::Rejected(_) => &[],
        }
    }

    /// Whether the command ran on this side.
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }

    /// Whether the command was skipped for a missing capability.
    pub fn is_skipped(&self) -> bool {
        matches!(self, Outcome::Skipped { .. })
    }
}

/// Per-side outcome of one broadcast command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Broadcast {
    pub left: Outcome,
    pub right: Outcome,
}

impl Broadcast {
    /// Outcome for one side.
    pub fn get(&self, side: Side) -> &Outcome {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Sides the command was not applied to because of a missing capability.
    pub fn skipped(&self) -> SmallVec<[Side; 2]> {
        Side::BOTH
            .into_iter()
            .filter(|side| self.get(*side).is_skipped())
            .collect()
    }

    /// Whether both sides ran the command.
    pub fn applied_to_both(&self) -> bool {
        self.left.is_applied() && self.right.is_applied()
    }
}

/// Tick reports from both sides.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PairReport {
    pub left: TickReport,
    pub right: TickReport,
}

impl PairReport {
    /// Tick report for one side.
    pub fn get(&self, side: Side) -> &TickReport {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }
}

pub struct ComparisonController {
    left: Player,
    right: Player,
    last_skipped: SmallVec<[Side; 2]>,
}

impl ComparisonController {
    /// Build both players over copies of `dataset` with the same configuration.
    pub fn new(
        config: PlayerConfig,
        dataset: Vec<i64>,
        left: SourceFactory,
        right: SourceFactory,
        clock: Rc<dyn Clock>,
    ) -> Result<Self> {
        let left = Player::new(config.clone(), dataset.clone(), left, clock.clone())?;
        let right = Player::new(config, dataset, right, clock)?;
        Ok(Self {
            left,
            right,
            last_skipped: SmallVec::new(),
        })
    }

    /// The player driving one side.
    pub fn player(&self, side: Side) -> &Player {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    fn player_mut(&mut self, side: Side) -> &mut Player {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// The left player.
    pub fn left(&self) -> &Player {
        &self.left
    }

    /// The right player.
    pub fn right(&self) -> &Player {
        &self.right
    }

    /// Sides skipped by the most recent capability-gated command.
    pub fn last_skipped(&self) -> &[Side] {
        &self.last_skipped
    }

    /// Either side is still advancing.
    pub fn is_running(&self) -> bool {
        self.left.is_running() || self.right.is_running()
    }

    /// Both sides have finished.
    pub fn is_finished(&self) -> bool {
        self.left.run_state() == RunState::Finished && self.right.run_state() == RunState::Finished
    }

    /// How far apart the two cursors are.
    pub fn index_gap(&self) -> usize {
        self.left.current_index().abs_diff(self.right.current_index())
    }

    /// Snapshots of both sides, left first.
    pub fn snapshots(&self) -> (PlaybackSnapshot, PlaybackSnapshot) {
        (self.left.snapshot(), self.right.snapshot())
    }

    /// Register a frame sink on one side.
    pub fn add_sink(&mut self, side: Side, sink: impl FrameSink + 'static) -> SinkId {
        self.player_mut(side).add_sink(sink)
    }

    /// Unregister a frame sink from one side.
    pub fn remove_sink(&mut self, side: Side, id: SinkId) -> bool {
        self.player_mut(side).remove_sink(id)
    }

    /// Grant or deny a capability on one side.
    pub fn set_capability(&mut self, side: Side, capability: Capability, enabled: bool) {
        self.player_mut(side).set_capability(capability, enabled);
    }

    // ------------------------------------------------------------------ transport

    /// Start both sides.
    pub fn start(&mut self) -> Broadcast {
        self.broadcast("start", None, |player| player.start())
    }

    /// Pause both sides.
    pub fn pause(&mut self) -> Broadcast {
        self.broadcast("pause", None, |player| Ok(player.pause()))
    }

    /// Toggle each side independently.
    pub fn toggle_pause(&mut self) -> Broadcast {
        self.broadcast("toggle_pause", None, |player| player.toggle_pause())
    }

    /// Step both sides forward by one operation.
    pub fn step_forward(&mut self) -> Broadcast {
        self.broadcast("step_forward", None, |player| player.step_forward())
    }

    /// Step both sides back, skipping a side that cannot.
    pub fn step_back(&mut self) -> Broadcast {
        self.broadcast("step_back", Some(Capability::StepBack), |player| {
            player.step_back()
        })
    }

    /// Reset both sides to `Idle` with fresh sources.
    pub fn reset(&mut self) -> Broadcast {
        self.broadcast("reset", None, |player| Ok(player.reset()))
    }

    /// Change both frame rates. An out-of-range rate is rejected before
    /// either side is touched.
    pub fn set_fps(&mut self, fps: u32) -> Result<Broadcast> {
        validate_fps(fps)?;
        Ok(self.broadcast("set_fps", None, |player| player.set_fps(fps)))
    }

    /// Change both sides' rate caps. Zero caps are rejected before either
    /// side is touched.
    pub fn set_caps(&mut self, per_tick: u32, per_second: u32) -> Result<Broadcast> {
        validate_caps(per_tick, per_second)?;
        Ok(self.broadcast("set_caps", None, |player| {
            player.set_caps(per_tick, per_second).map(|()| Events::new())
        }))
    }

    /// Tick both sides. Neither waits for the other.
    pub fn tick(&mut self) -> PairReport {
        PairReport {
            left: self.left.tick(),
            right: self.right.tick(),
        }
    }

    fn broadcast(
        &mut self,
        command: &'static str,
        gate: Option<Capability>,
        mut apply: impl FnMut(&mut Player) -> Result<Events>,
    ) -> Broadcast {
        let left = dispatch(&mut self.left, gate, &mut apply);
        let right = dispatch(&mut self.right, gate, &mut apply);
        let broadcast = Broadcast { left, right };

        if gate.is_some() {
            self.last_skipped = broadcast.skipped();
        }
        tracing::debug!(
            command,
            skipped = ?broadcast.skipped(),
            left = self.left.current_index(),
            right = self.right.current_index(),
            "broadcast"
        );
        broadcast
    }
}

fn dispatch(
    player: &mut Player,
    gate: Option<Capability>,
    apply: &mut impl FnMut(&mut Player) -> Result<Events>,
) -> Outcome {
    if let Some(capability) = gate {
        if !player.capabilities().supports(capability) {
            return Outcome::Skipped { capability };
        }
    }
    match apply(player) {
        Ok(events) => Outcome::Applied(events),
        Err(err) => Outcome::Rejected(err),
    }
}

impl std::fmt::Debug for ComparisonController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComparisonController")
            .field("left", &self.left)
            .field("right", &self.right)
            .field("last_skipped", &self.last_skipped)
            .finish()
    }
}
