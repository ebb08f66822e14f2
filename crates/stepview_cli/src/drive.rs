//! Headless drivers: tick players to completion and summarize the runs.

use anyhow::{bail, Result};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;
use stepview_algos::AlgoInfo;
use stepview_core::Metrics;
use stepview_player::{
    source_factory, Clock, ComparisonController, FrameView, ManualClock, Player, PlayerConfig,
    Side, SourceFactory, SystemClock, Termination,
};

/// How time passes between ticks.
#[derive(Clone, Debug)]
pub enum Pace {
    /// A manual clock advanced by exactly one frame per tick.
    Simulated(ManualClock),
    /// The host clock, sleeping one frame between ticks.
    Realtime,
}

impl Pace {
    /// Realtime pacing uses the system clock; otherwise a fresh manual clock.
    pub fn new(realtime: bool) -> Self {
        if realtime {
            Pace::Realtime
        } else {
            Pace::Simulated(ManualClock::new())
        }
    }

    fn clock(&self) -> Rc<dyn Clock> {
        match self {
            Pace::Simulated(clock) => Rc::new(clock.clone()),
            Pace::Realtime => Rc::new(SystemClock),
        }
    }

    fn wait(&self, frame: Duration) {
        match self {
            Pace::Simulated(clock) => clock.advance(frame),
            Pace::Realtime => std::thread::sleep(frame),
        }
    }
}

/// Outcome of one finished run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub algo: &'static str,
    pub operations: usize,
    pub metrics: Metrics,
    pub logical: Duration,
    pub wall: Duration,
    pub sorted: bool,
}

impl RunSummary {
    fn from_player(algo: &'static str, player: &Player, expected: &[i64]) -> Result<Self> {
        if let Some(Termination::Failed(err)) = player.termination() {
            bail!("{algo} run failed: {err}");
        }
        Ok(Self {
            algo,
            operations: player.log().len(),
            metrics: player.metrics(),
            logical: player.logical_elapsed(),
            wall: player.wall_elapsed(),
            sorted: player.state().values() == expected,
        })
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<10} ops={:<6} comparisons={:<6} swaps={:<6} logical={:>8.1}ms wall={:>8.1}ms sorted={}",
            self.algo,
            self.operations,
            self.metrics.comparisons,
            self.metrics.swaps,
            self.logical.as_secs_f64() * 1_000.0,
            self.wall.as_secs_f64() * 1_000.0,
            self.sorted,
        )
    }
}

fn factory(info: &'static AlgoInfo) -> SourceFactory {
    source_factory(move |data: &[i64]| info.source(data))
}

fn frame_interval(config: &PlayerConfig) -> Duration {
    Duration::from_secs(1) / config.frames_per_second
}

fn sorted(data: &[i64]) -> Vec<i64> {
    let mut expected = data.to_vec();
    expected.sort_unstable();
    expected
}

fn trace_frame(frame: &FrameView<'_>) {
    tracing::trace!(
        index = frame.current_index,
        comparisons = frame.comparisons(),
        swaps = frame.swaps(),
        "frame"
    );
}

/// Play one algorithm over `data` until it finishes.
pub fn run_single(
    info: &'static AlgoInfo,
    config: PlayerConfig,
    data: Vec<i64>,
    pace: &Pace,
) -> Result<RunSummary> {
    let expected = sorted(&data);
    let frame = frame_interval(&config);
    let mut player = Player::new(config, data, factory(info), pace.clock())?;
    player.add_sink(trace_frame);

    player.start()?;
    while player.termination().is_none() {
        let report = player.tick();
        if let Some(bp) = report.backpressure() {
            tracing::debug!(shortfall = bp.shortfall, reason = ?bp.reason, "deferred");
        }
        pace.wait(frame);
    }
    RunSummary::from_player(info.key, &player, &expected)
}

/// Result of a side-by-side run.
#[derive(Clone, Debug)]
pub struct ComparisonSummary {
    pub left: RunSummary,
    pub right: RunSummary,
    /// Widest cursor gap seen while both sides were playing.
    pub max_gap: usize,
}

/// Play two algorithms over the same dataset under one controller.
pub fn run_compare(
    left: &'static AlgoInfo,
    right: &'static AlgoInfo,
    config: PlayerConfig,
    data: Vec<i64>,
    pace: &Pace,
) -> Result<ComparisonSummary> {
    let expected = sorted(&data);
    let frame = frame_interval(&config);
    let mut compare =
        ComparisonController::new(config, data, factory(left), factory(right), pace.clock())?;
    for side in Side::BOTH {
        compare.add_sink(side, trace_frame);
    }

    compare.start();
    let mut max_gap = 0;
    while !compare.is_finished() {
        let report = compare.tick();
        for side in Side::BOTH {
            if let Some(termination) = report.get(side).finished() {
                tracing::info!(side = side.name(), failed = termination.is_failure(), "side finished");
            }
        }
        max_gap = max_gap.max(compare.index_gap());
        pace.wait(frame);
    }

    Ok(ComparisonSummary {
        left: RunSummary::from_player(left.key, compare.left(), &expected)?,
        right: RunSummary::from_player(right.key, compare.right(), &expected)?,
        max_gap,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepview_algos::lookup;

    #[test]
    fn test_simulated_run_is_reproducible() {
        let data = vec![5, 2, 8, 1, 9];
        let info = lookup("bubble").unwrap();
        let config = PlayerConfig::default();

        let a = run_single(info, config.clone(), data.clone(), &Pace::new(false)).unwrap();
        let b = run_single(info, config, data, &Pace::new(false)).unwrap();

        assert_eq!(a, b);
        assert!(a.sorted);
        assert_eq!(a.operations, 19);
        assert_eq!(a.metrics.swaps, 4);
        assert_eq!(a.logical, stepview_player::logical_elapsed(19, 24));
    }

    #[test]
    fn test_compare_finishes_both_sides() {
        let data: Vec<i64> = (1..=12).rev().collect();
        let summary = run_compare(
            lookup("merge").unwrap(),
            lookup("bubble").unwrap(),
            PlayerConfig::default().with_fps(60),
            data,
            &Pace::new(false),
        )
        .unwrap();

        assert!(summary.left.sorted && summary.right.sorted);
        assert!(summary.left.operations < summary.right.operations);
        assert!(summary.max_gap > 0);
    }
}
