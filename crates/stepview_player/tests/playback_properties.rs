//! Integration tests for deterministic playback
//!
//! These tests drive real algorithm sources through the player and verify:
//! - Independent runs over the same dataset and seed are identical
//! - Replaying a full log reproduces the sorted dataset
//! - Seeking through checkpoints matches direct replay at every index
//! - Rate caps bound the work done per tick and per second
//! - Two players under one controller finish independently

use pretty_assertions::assert_eq;
use std::rc::Rc;
use std::time::Duration;
use stepview_algos::{algorithms, lookup, AlgoInfo, Preset};
use stepview_core::{reconstruct, seek, ReplayState, VecSource};
use stepview_player::{
    source_factory, CapKind, Clock, ComparisonController, ManualClock, Player, PlayerConfig,
    PlayerEvent, RunState, Termination,
};

fn algo_player(
    info: &'static AlgoInfo,
    config: PlayerConfig,
    data: Vec<i64>,
    clock: &ManualClock,
) -> Player {
    Player::new(
        config,
        data,
        source_factory(move |data: &[i64]| info.source(data)),
        Rc::new(clock.clone()),
    )
    .unwrap()
}

/// Tick at the frame interval until the run ends.
fn play_to_end(player: &mut Player, clock: &ManualClock, max_ticks: usize) -> Termination {
    let frame = Duration::from_secs(1) / player.frames_per_second();
    player.start().unwrap();
    for _ in 0..max_ticks {
        if let Some(termination) = player.tick().finished() {
            return termination.clone();
        }
        clock.advance(frame);
    }
    panic!("run did not finish within {max_ticks} ticks");
}

#[test]
fn test_independent_runs_are_identical() {
    let data = Preset::Random.generate(24, 5, 100, 42).unwrap();
    for info in algorithms() {
        let clock = ManualClock::new();
        let config = PlayerConfig::default().with_fps(60).with_stride(16);
        let mut first = algo_player(info, config.clone(), data.clone(), &clock);
        let mut second = algo_player(info, config, data.clone(), &clock);

        let a = play_to_end(&mut first, &clock, 10_000);
        let b = play_to_end(&mut second, &clock, 10_000);

        assert_eq!(a, b, "{}", info.key);
        assert_eq!(first.trace(), second.trace(), "{}", info.key);
        assert_eq!(first.state(), second.state(), "{}", info.key);
        assert_eq!(first.metrics(), second.metrics(), "{}", info.key);
    }
}

#[test]
fn test_full_replay_yields_sorted_dataset() {
    for preset in Preset::ALL {
        let data = preset.generate(30, 1, 50, 11).unwrap();
        let mut expected = data.clone();
        expected.sort();

        for info in algorithms() {
            let clock = ManualClock::new();
            let config = PlayerConfig::default().with_fps(60);
            let mut player = algo_player(info, config, data.clone(), &clock);
            play_to_end(&mut player, &clock, 20_000);

            let initial = ReplayState::new(data.clone());
            let full = reconstruct(&initial, player.log(), 0, player.log().len()).unwrap();
            assert_eq!(full.state.values(), expected.as_slice(), "{} on {preset}", info.key);
            assert_eq!(player.state().values(), expected.as_slice());
        }
    }
}

#[test]
fn test_checkpoint_seek_matches_direct_replay() {
    let data = Preset::ReverseRun.generate(20, 0, 99, 5).unwrap();
    let initial = ReplayState::new(data.clone());

    for info in algorithms() {
        let clock = ManualClock::new();
        let config = PlayerConfig::default().with_stride(7);
        let mut player = algo_player(info, config, data.clone(), &clock);
        while player.run_state() != RunState::Finished {
            player.step_forward().unwrap();
        }

        let len = player.log().len();
        assert!(player.checkpoints().len() >= len / 7);
        for target in 0..=len {
            let direct = reconstruct(&initial, player.log(), 0, target).unwrap();
            let via_checkpoint = seek(player.checkpoints(), player.log(), target).unwrap();
            assert_eq!(via_checkpoint, direct, "{} at {target}", info.key);
        }
    }
}

#[test]
fn test_seek_is_idempotent() {
    let clock = ManualClock::new();
    let data = Preset::Random.generate(16, 0, 40, 3).unwrap();
    let config = PlayerConfig::default().with_stride(5);
    let mut player = algo_player(lookup("heap").unwrap(), config, data, &clock);
    while player.run_state() != RunState::Finished {
        player.step_forward().unwrap();
    }

    let target = player.log().len() / 2;
    player.seek(target).unwrap();
    let first = player.snapshot();
    let state = player.state().clone();
    player.seek(target).unwrap();
    assert_eq!(player.snapshot(), first);
    assert_eq!(player.state(), &state);
}

#[test]
fn test_linear_run_scenario() {
    let clock = ManualClock::new();
    let bubble = lookup("bubble").unwrap();
    let mut player = algo_player(bubble, PlayerConfig::default(), vec![5, 2, 8, 1, 9], &clock);
    let termination = play_to_end(&mut player, &clock, 1_000);

    assert!(matches!(termination, Termination::Completed { operations: 19, .. }));
    assert_eq!(player.state().values(), &[1, 2, 5, 8, 9]);

    player.seek(0).unwrap();
    assert_eq!(player.state().values(), &[5, 2, 8, 1, 9]);

    let len = player.log().len();
    player.seek(len).unwrap();
    assert_eq!(player.state().values(), &[1, 2, 5, 8, 9]);
    assert_eq!(player.run_state(), RunState::Finished);
}

#[test]
fn test_scrub_scenario() {
    let clock = ManualClock::new();
    let data = vec![6, 5, 4, 3, 2, 1];
    let mut ops = lookup("bubble").unwrap().record(&data);
    ops.truncate(20);

    let mut player = Player::new(
        PlayerConfig::default().with_stride(2),
        data,
        source_factory(move |_: &[i64]| VecSource::new(ops.clone())),
        Rc::new(clock.clone()),
    )
    .unwrap();
    while player.run_state() != RunState::Finished {
        player.step_forward().unwrap();
    }
    assert_eq!(player.log().len(), 20);
    assert_eq!(player.checkpoints().len(), 11);

    player.seek(13).unwrap();
    let first = player.snapshot();
    player.seek(7).unwrap();
    assert_eq!(player.current_index(), 7);
    player.seek(13).unwrap();
    let second = player.snapshot();

    assert_eq!(first, second);
    assert_eq!(second.current_index, 13);
    assert_eq!(second.run_state, RunState::Paused);
}

#[test]
fn test_rate_caps_bound_consumption() {
    let clock = ManualClock::new();
    let data = Preset::ReverseSorted.generate(40, 0, 500, 1).unwrap();
    let mut player = algo_player(
        lookup("bubble").unwrap(),
        PlayerConfig::default().with_fps(60).with_caps(8, 20),
        data,
        &clock,
    );
    player.start().unwrap();

    let start = clock.now();
    let mut pulls: Vec<(Duration, usize)> = Vec::new();
    let mut reasons = Vec::new();
    for _ in 0..24 {
        let before = player.log().len();
        let report = player.tick();
        let pulled = player.log().len() - before;

        assert!(pulled <= 8, "tick pulled {pulled}");
        assert_eq!(pulled as u64, report.advanced);
        if let Some(bp) = report.backpressure() {
            assert_eq!(bp.shortfall, bp.due - bp.advanced);
            reasons.push(bp.reason);
        }
        pulls.push((clock.now() - start, pulled));
        clock.advance_millis(250);
    }

    for (i, (at, _)) in pulls.iter().enumerate() {
        let window: usize = pulls[..=i]
            .iter()
            .filter(|(t, _)| *at - *t < Duration::from_secs(1))
            .map(|(_, n)| n)
            .sum();
        assert!(window <= 20, "window ending at {at:?} pulled {window}");
    }
    assert!(reasons.contains(&CapKind::PerTick));
    assert!(reasons.contains(&CapKind::PerSecond));
    assert!(player.is_backpressured());
    assert_eq!(player.run_state(), RunState::Running);
}

#[test]
fn test_backpressure_clears_when_caught_up() {
    let clock = ManualClock::new();
    let data = Preset::ReverseSorted.generate(12, 0, 50, 2).unwrap();
    let mut player = algo_player(
        lookup("selection").unwrap(),
        PlayerConfig::default().with_fps(20).with_caps(2, 1000),
        data,
        &clock,
    );
    player.start().unwrap();
    player.tick();

    clock.advance_millis(200);
    let report = player.tick();
    assert_eq!(report.due, 4);
    assert_eq!(report.advanced, 2);
    assert!(report.backpressure().is_some());

    let report = player.tick();
    assert_eq!(report.advanced, 2);
    assert!(report.events.contains(&PlayerEvent::BackpressureCleared));
    assert!(!player.is_backpressured());
    assert_eq!(player.current_index(), 5);
}

#[test]
fn test_comparison_divergence_scenario() {
    let clock = ManualClock::new();
    let data: Vec<i64> = (1..=10).rev().collect();
    let sparse = lookup("merge").unwrap();
    let dense = lookup("bubble").unwrap();
    assert!(sparse.record(&data).len() < dense.record(&data).len());

    let mut compare = ComparisonController::new(
        PlayerConfig::default().with_fps(30),
        data.clone(),
        source_factory(move |data: &[i64]| sparse.source(data)),
        source_factory(move |data: &[i64]| dense.source(data)),
        Rc::new(clock.clone()),
    )
    .unwrap();
    assert!(compare.start().applied_to_both());

    let mut left_finished_while_right_ran = false;
    for _ in 0..10_000 {
        let report = compare.tick();
        if report.left.finished().is_some() && compare.right().is_running() {
            left_finished_while_right_ran = true;
        }
        if compare.is_finished() {
            break;
        }
        clock.advance_millis(33);
    }

    let mut expected = data;
    expected.sort();
    assert!(compare.is_finished());
    assert!(left_finished_while_right_ran);
    assert_eq!(compare.left().state().values(), expected.as_slice());
    assert_eq!(compare.right().state().values(), expected.as_slice());
    assert_ne!(compare.left().log().len(), compare.right().log().len());
}
