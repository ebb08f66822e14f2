//! Playback scheduler.
//!
//! The player drives a [`RunSession`] forward in time. Each [`Player::tick`]
//! works out how many operations are due from wall time, advances at most
//! that many within the rate caps, and reports any shortfall as
//! backpressure. Operations are never skipped; a capped player only slows
//! down.
//!
//! Transport methods return the events they caused. Fatal errors never come
//! back as `Err`: they finish the run and arrive as
//! [`PlayerEvent::Finished`] carrying [`Termination::Failed`]. `Err` is
//! reserved for rejected commands that leave the run intact.

use slotmap::{new_key_type, SlotMap};
use std::rc::Rc;
use std::time::{Duration, Instant};
use stepview_core::{
    Advance, Capability, CapabilityMap, CheckpointStore, Metrics, OperationLog, ReplayError,
    ReplayState, RunSession, Source, Trace,
};

use crate::clock::{frames_within, logical_elapsed, Clock, Stopwatch};
use crate::config::{validate_caps, validate_fps, PlayerConfig};
use crate::error::{PlaybackError, Result};
use crate::event::{
    Backpressure, Events, FrameSink, FrameView, PlaybackSnapshot, PlayerEvent, RunState,
    Termination, TickReport,
};
use crate::rate::RateLimiter;

new_key_type! {
    /// Handle returned by [`Player::add_sink`].
    pub struct SinkId;
}

/// Builds a fresh source for a dataset. Called at construction and on every reset.
pub type SourceFactory = Box<dyn FnMut(&[i64]) -> Box<dyn Source>>;

/// Box a closure that builds a concrete source into a [`SourceFactory`].
pub fn source_factory<F, S>(mut build: F) -> SourceFactory
where
    F: FnMut(&[i64]) -> S + 'static,
    S: Source + 'static,
{
    Box::new(move |data: &[i64]| Box::new(build(data)) as Box<dyn Source>)
}

pub struct Player {
    config: PlayerConfig,
    clock: Rc<dyn Clock>,
    factory: SourceFactory,
    session: RunSession,
    run_state: RunState,
    capabilities: CapabilityMap,
    stopwatch: Stopwatch,
    limiter: RateLimiter,
    /// Wall time at which the current scheduling anchor was set.
    anchor_wall: Duration,
    /// Operations advanced by ticks since the anchor.
    frames_since_anchor: u64,
    backpressured: bool,
    terminal_emitted: bool,
    termination: Option<Termination>,
    sinks: SlotMap<SinkId, Box<dyn FrameSink>>,
}

impl Player {
    /// Create a player over `dataset`, validating `config`.
    pub fn new(
        config: PlayerConfig,
        dataset: Vec<i64>,
        mut factory: SourceFactory,
        clock: Rc<dyn Clock>,
    ) -> Result<Self> {
        config.validate()?;

        let source = factory(&dataset);
        let session = RunSession::new(ReplayState::new(dataset), source, config.stride);
        let capabilities = CapabilityMap::new()
            .with(Capability::StepBack, config.allow_step_back)
            .with(Capability::HasKnownTotalLength, session.has_known_total_len())
            .with(Capability::TrueTime, true)
            .with(Capability::Detach, false);

        Ok(Self {
            limiter: RateLimiter::new(config.per_tick_cap, config.per_second_cap),
            config,
            clock,
            factory,
            session,
            run_state: RunState::Idle,
            capabilities,
            stopwatch: Stopwatch::new(),
            anchor_wall: Duration::ZERO,
            frames_since_anchor: 0,
            backpressured: false,
            terminal_emitted: false,
            termination: None,
            sinks: SlotMap::with_key(),
        })
    }

    // ------------------------------------------------------------------ queries

    /// Active configuration.
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Current transport state.
    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    /// Whether playback is advancing on ticks.
    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }

    /// Number of operations applied to the visible state.
    pub fn current_index(&self) -> usize {
        self.session.position()
    }

    /// Current frame rate.
    pub fn frames_per_second(&self) -> u32 {
        self.config.frames_per_second
    }

    /// State at the current index.
    pub fn state(&self) -> &ReplayState {
        self.session.state()
    }

    /// Metrics at the current index.
    pub fn metrics(&self) -> Metrics {
        self.session.metrics()
    }

    /// Operations recorded so far.
    pub fn log(&self) -> &OperationLog {
        self.session.log()
    }

    /// Snapshots taken while recording.
    pub fn checkpoints(&self) -> &CheckpointStore {
        self.session.checkpoints()
    }

    /// Known total length of the run, if any.
    pub fn total_len(&self) -> Option<usize> {
        self.session.total_len()
    }

    /// What this run supports.
    pub fn capabilities(&self) -> &CapabilityMap {
        &self.capabilities
    }

    /// Override a capability, e.g. to deny stepping back.
    pub fn set_capability(&mut self, capability: Capability, enabled: bool) {
        self.capabilities.set(capability, enabled);
    }

    /// How the run ended, once it has.
    pub fn termination(&self) -> Option<&Termination> {
        self.termination.as_ref()
    }

    /// Whether the last tick fell short of the due count.
    pub fn is_backpressured(&self) -> bool {
        self.backpressured
    }

    /// Wall time spent running, excluding pauses.
    pub fn wall_elapsed(&self) -> Duration {
        self.stopwatch.elapsed(self.clock.now())
    }

    /// `current_index / frames_per_second`, independent of the host.
    pub fn logical_elapsed(&self) -> Duration {
        logical_elapsed(self.session.position(), self.config.frames_per_second)
    }

    /// Read-only view handed to sinks.
    pub fn frame(&self) -> FrameView<'_> {
        FrameView {
            state: self.session.state(),
            metrics: self.session.metrics(),
            current_index: self.session.position(),
            total: self.session.total_len(),
            logical_elapsed: self.logical_elapsed(),
            wall_elapsed: self.wall_elapsed(),
        }
    }

    /// Owned copy of the playback position and counters.
    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            run_state: self.run_state,
            current_index: self.session.position(),
            log_len: self.session.log().len(),
            total: self.session.total_len(),
            values: self.session.state().values().to_vec(),
            metrics: self.session.metrics(),
            frames_per_second: self.config.frames_per_second,
            logical_elapsed: self.logical_elapsed(),
            wall_elapsed: self.wall_elapsed(),
        }
    }

    /// Serializable form of everything recorded so far.
    pub fn trace(&self) -> Trace {
        Trace::from_log(self.session.initial(), self.session.log())
    }

    // ------------------------------------------------------------------ sinks

    /// Register a consumer that receives a frame after every advance.
    pub fn add_sink(&mut self, sink: impl FrameSink + 'static) -> SinkId {
        self.sinks.insert(Box::new(sink))
    }

    /// Unregister a sink. Returns whether it was registered.
    pub fn remove_sink(&mut self, id: SinkId) -> bool {
        self.sinks.remove(id).is_some()
    }

    fn notify(&mut self, now: Instant) {
        if self.sinks.is_empty() {
            return;
        }
        let frame = FrameView {
            state: self.session.state(),
            metrics: self.session.metrics(),
            current_index: self.session.position(),
            total: self.session.total_len(),
            logical_elapsed: logical_elapsed(
                self.session.position(),
                self.config.frames_per_second,
            ),
            wall_elapsed: self.stopwatch.elapsed(now),
        };
        for (_, sink) in self.sinks.iter_mut() {
            sink.on_frame(&frame);
        }
    }

    // ------------------------------------------------------------------ transport

    /// Start or resume playback.
    ///
    /// From `Finished` this only resumes if the cursor was moved back from
    /// the end; a finished run at its end stays put until [`Player::reset`].
    pub fn start(&mut self) -> Result<Events> {
        let mut events = Events::new();
        match self.run_state {
            RunState::Running => return Ok(events),
            RunState::Finished if self.session.at_end() => {
                tracing::debug!("start ignored: run already finished");
                return Ok(events);
            }
            RunState::Idle | RunState::Paused | RunState::Finished => {}
        }

        let now = self.clock.now();
        self.stopwatch.start(now);
        self.reanchor(now);
        self.run_state = RunState::Running;
        tracing::debug!(index = self.current_index(), "playback started");
        events.push(PlayerEvent::Started {
            index: self.current_index(),
        });
        Ok(events)
    }

    /// Pause playback. No-op unless running.
    pub fn pause(&mut self) -> Events {
        let mut events = Events::new();
        if self.run_state != RunState::Running {
            return events;
        }
        let now = self.clock.now();
        self.stopwatch.pause(now);
        self.run_state = RunState::Paused;
        tracing::debug!(index = self.current_index(), "playback paused");
        events.push(PlayerEvent::Paused {
            index: self.current_index(),
        });
        events
    }

    /// Pause if running, otherwise start.
    pub fn toggle_pause(&mut self) -> Result<Events> {
        if self.is_running() {
            Ok(self.pause())
        } else {
            self.start()
        }
    }

    /// Advance by exactly one operation, pausing first if running.
    ///
    /// At the end of a finished run this does nothing.
    pub fn step_forward(&mut self) -> Result<Events> {
        let mut events = self.pause();
        if self.run_state == RunState::Finished && self.session.at_end() {
            return Ok(events);
        }

        let now = self.clock.now();
        match self.session.advance() {
            Ok(Advance::Exhausted) => events.extend(self.enter_end(now)),
            Ok(Advance::Replayed | Advance::Pulled) => {
                self.notify(now);
                events.push(PlayerEvent::Stepped {
                    index: self.current_index(),
                    forward: true,
                });
                if self.session.at_end() {
                    events.extend(self.enter_end(now));
                } else {
                    self.run_state = RunState::Paused;
                }
            }
            Err(err) => events.extend(self.fail(now, err)),
        }
        Ok(events)
    }

    /// Retreat by exactly one operation through the replay engine.
    pub fn step_back(&mut self) -> Result<Events> {
        if !self.capabilities.supports(Capability::StepBack) {
            return Err(PlaybackError::UnsupportedOperation {
                capability: Capability::StepBack,
            });
        }

        let mut events = self.pause();
        let now = self.clock.now();
        match self.session.retreat() {
            Ok(true) => {
                self.run_state = RunState::Paused;
                self.notify(now);
                events.push(PlayerEvent::Stepped {
                    index: self.current_index(),
                    forward: false,
                });
            }
            Ok(false) => {}
            Err(err) => events.extend(self.fail(now, err)),
        }
        Ok(events)
    }

    /// Jump to `target` within the recorded log, pausing first if running.
    pub fn seek(&mut self, target: usize) -> Result<Events> {
        let len = self.session.log().len();
        if target > len {
            return Err(ReplayError::IndexOutOfRange { index: target, len }.into());
        }

        let mut events = self.pause();
        let now = self.clock.now();
        if let Err(err) = self.session.seek(target) {
            events.extend(self.fail(now, err));
            return Ok(events);
        }

        self.notify(now);
        events.push(PlayerEvent::Seeked { index: target });
        if self.session.at_end() {
            events.extend(self.enter_end(now));
        } else if self.run_state != RunState::Idle || target > 0 {
            self.run_state = RunState::Paused;
        }
        Ok(events)
    }

    /// Change the frame rate. Validated against the supported range.
    pub fn set_fps(&mut self, fps: u32) -> Result<Events> {
        validate_fps(fps)?;
        self.config.frames_per_second = fps;
        if self.is_running() {
            let now = self.clock.now();
            self.reanchor(now);
        }
        tracing::debug!(fps, "frame rate changed");
        let mut events = Events::new();
        events.push(PlayerEvent::FpsChanged { fps });
        Ok(events)
    }

    /// Change the per-tick and per-second caps. Both must be positive.
    ///
    /// Advances made in the last second still count against the new
    /// per-second cap.
    pub fn set_caps(&mut self, per_tick: u32, per_second: u32) -> Result<()> {
        validate_caps(per_tick, per_second)?;
        self.config.per_tick_cap = per_tick;
        self.config.per_second_cap = per_second;
        self.limiter.set_caps(per_tick, per_second);
        tracing::debug!(per_tick, per_second, "rate caps changed");
        Ok(())
    }

    /// Discard the run and return to `Idle` with a fresh source.
    pub fn reset(&mut self) -> Events {
        let mut events = Events::new();
        if self.backpressured {
            events.push(PlayerEvent::BackpressureCleared);
        }

        let source = (self.factory)(self.session.initial().values());
        self.session.reset(source);
        self.capabilities.set(
            Capability::HasKnownTotalLength,
            self.session.has_known_total_len(),
        );
        self.stopwatch.reset();
        self.limiter.clear();
        self.anchor_wall = Duration::ZERO;
        self.frames_since_anchor = 0;
        self.backpressured = false;
        self.terminal_emitted = false;
        self.termination = None;
        self.run_state = RunState::Idle;

        let now = self.clock.now();
        self.notify(now);
        tracing::debug!("player reset");
        events.push(PlayerEvent::Reset);
        events
    }

    // ------------------------------------------------------------------ scheduling

    /// Advance toward the number of operations due by now.
    ///
    /// A frame slot counts as due once its start time is within the jitter
    /// budget of the current wall time. Does nothing unless running.
    ///
    /// Every [`Player::start`] re-anchors the schedule, so the frame slot at
    /// the moment of starting is due immediately. Repeated start/pause at a
    /// single instant therefore advances one operation per start.
    pub fn tick(&mut self) -> TickReport {
        let mut report = TickReport::default();
        if self.run_state != RunState::Running {
            return report;
        }

        let now = self.clock.now();
        let since_anchor = self
            .stopwatch
            .elapsed(now)
            .saturating_sub(self.anchor_wall);
        let scheduled = frames_within(
            since_anchor + self.config.jitter_budget(),
            self.config.frames_per_second,
        );
        let due = scheduled.saturating_sub(self.frames_since_anchor);
        let (allowed, binding) = self.limiter.allowance(now, due);
        report.due = due;

        while report.advanced < allowed {
            match self.session.advance() {
                Ok(Advance::Exhausted) => {
                    report.events.extend(self.enter_end(now));
                    break;
                }
                Ok(Advance::Replayed | Advance::Pulled) => {
                    report.advanced += 1;
                    self.frames_since_anchor += 1;
                    self.limiter.record(now);
                    self.notify(now);
                    if self.session.at_end() {
                        report.events.extend(self.enter_end(now));
                        break;
                    }
                }
                Err(err) => {
                    report.events.extend(self.fail(now, err));
                    break;
                }
            }
        }

        if self.run_state == RunState::Running {
            match binding {
                Some(reason) if report.advanced < due => {
                    if !self.backpressured {
                        tracing::debug!(due, advanced = report.advanced, ?reason, "backpressure engaged");
                    }
                    self.backpressured = true;
                    report.events.push(PlayerEvent::Backpressure(Backpressure {
                        due,
                        advanced: report.advanced,
                        shortfall: due - report.advanced,
                        reason,
                    }));
                }
                _ if self.backpressured => {
                    tracing::debug!("backpressure cleared");
                    self.backpressured = false;
                    report.events.push(PlayerEvent::BackpressureCleared);
                }
                _ => {}
            }
        }

        report
    }

    fn reanchor(&mut self, now: Instant) {
        self.anchor_wall = self.stopwatch.elapsed(now);
        self.frames_since_anchor = 0;
    }

    /// Enter `Finished` at the end of the run. Emits the terminal event only
    /// the first time the run ends.
    fn enter_end(&mut self, now: Instant) -> Option<PlayerEvent> {
        self.stopwatch.pause(now);
        self.run_state = RunState::Finished;
        if self.terminal_emitted {
            return None;
        }

        self.terminal_emitted = true;
        let termination = Termination::Completed {
            operations: self.session.log().len(),
            metrics: self.session.metrics(),
        };
        tracing::info!(
            operations = self.session.log().len(),
            comparisons = self.session.metrics().comparisons,
            swaps = self.session.metrics().swaps,
            "run finished"
        );
        self.termination = Some(termination.clone());
        Some(PlayerEvent::Finished(termination))
    }

    fn fail(&mut self, now: Instant, err: ReplayError) -> Option<PlayerEvent> {
        self.stopwatch.pause(now);
        self.run_state = RunState::Finished;
        tracing::error!(%err, index = self.current_index(), "run failed");

        let termination = Termination::Failed(err.into());
        self.termination = Some(termination.clone());
        if self.terminal_emitted {
            return None;
        }
        self.terminal_emitted = true;
        Some(PlayerEvent::Finished(termination))
    }
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("run_state", &self.run_state)
            .field("session", &self.session)
            .field("config", &self.config)
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::error::ConfigError;
    use crate::rate::CapKind;
    use std::cell::RefCell;
    use stepview_core::{IterSource, Operation, SourceError, VecSource};

    fn exchange_trace() -> Vec<Operation> {
        vec![
            Operation::compare(0, 1),
            Operation::swap(0, 1, [2, 1]),
            Operation::confirm(0),
            Operation::confirm(1),
        ]
    }

    fn player_with(config: PlayerConfig, clock: &ManualClock) -> Player {
        Player::new(
            config,
            vec![2, 1],
            Box::new(|_: &[i64]| Box::new(VecSource::new(exchange_trace())) as Box<dyn Source>),
            Rc::new(clock.clone()),
        )
        .unwrap()
    }

    #[test]
    fn test_player_creation() {
        let clock = ManualClock::new();
        let player = player_with(PlayerConfig::default(), &clock);

        assert_eq!(player.run_state(), RunState::Idle);
        assert_eq!(player.current_index(), 0);
        assert_eq!(player.total_len(), Some(4));
        assert!(player.capabilities().supports(Capability::StepBack));
        assert!(player.capabilities().supports(Capability::HasKnownTotalLength));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let clock = ManualClock::new();
        let result = Player::new(
            PlayerConfig::default().with_fps(120),
            vec![1],
            Box::new(|_: &[i64]| Box::new(VecSource::default()) as Box<dyn Source>),
            Rc::new(clock),
        );
        assert!(matches!(result, Err(PlaybackError::Config(_))));
    }

    #[test]
    fn test_tick_is_noop_unless_running() {
        let clock = ManualClock::new();
        let mut player = player_with(PlayerConfig::default(), &clock);

        clock.advance_millis(1_000);
        assert_eq!(player.tick(), TickReport::default());
        assert_eq!(player.current_index(), 0);
    }

    #[test]
    fn test_one_operation_per_frame() {
        let clock = ManualClock::new();
        let mut player = player_with(PlayerConfig::default().with_fps(10), &clock);
        player.start().unwrap();

        assert_eq!(player.tick().advanced, 1);
        clock.advance_millis(100);
        assert_eq!(player.tick().advanced, 1);
        clock.advance_millis(50);
        assert_eq!(player.tick().advanced, 0);
        assert_eq!(player.current_index(), 2);
        assert_eq!(player.logical_elapsed(), Duration::from_millis(200));
    }

    #[test]
    fn test_late_tick_catches_up() {
        let clock = ManualClock::new();
        let mut player = player_with(
            PlayerConfig::default().with_fps(10).with_caps(8, 1000),
            &clock,
        );
        player.start().unwrap();
        player.tick();

        clock.advance_millis(250);
        let report = player.tick();
        assert_eq!(report.due, 2);
        assert_eq!(report.advanced, 2);
    }

    #[test]
    fn test_finishes_once_with_completed_event() {
        let clock = ManualClock::new();
        let mut player = player_with(PlayerConfig::default().with_fps(10), &clock);
        player.start().unwrap();

        let mut terminal = Vec::new();
        for _ in 0..10 {
            let report = player.tick();
            terminal.extend(report.finished().cloned());
            clock.advance_millis(100);
        }

        assert_eq!(player.run_state(), RunState::Finished);
        assert_eq!(terminal.len(), 1);
        assert!(matches!(
            terminal[0],
            Termination::Completed { operations: 4, .. }
        ));
        assert_eq!(player.state().values(), &[1, 2]);
    }

    #[test]
    fn test_pause_freezes_wall_clock() {
        let clock = ManualClock::new();
        let mut player = player_with(PlayerConfig::default(), &clock);
        player.start().unwrap();
        clock.advance_millis(30);
        player.pause();
        clock.advance_millis(500);

        assert_eq!(player.run_state(), RunState::Paused);
        assert_eq!(player.wall_elapsed(), Duration::from_millis(30));
    }

    #[test]
    fn test_step_forward_pauses_and_advances() {
        let clock = ManualClock::new();
        let mut player = player_with(PlayerConfig::default(), &clock);
        player.start().unwrap();

        let events = player.step_forward().unwrap();
        assert!(events.contains(&PlayerEvent::Paused { index: 0 }));
        assert!(events.contains(&PlayerEvent::Stepped {
            index: 1,
            forward: true
        }));
        assert_eq!(player.run_state(), RunState::Paused);
    }

    #[test]
    fn test_step_past_end_does_not_restart() {
        let clock = ManualClock::new();
        let mut player = player_with(PlayerConfig::default(), &clock);
        for _ in 0..4 {
            player.step_forward().unwrap();
        }
        assert_eq!(player.run_state(), RunState::Finished);

        for _ in 0..3 {
            assert!(player.step_forward().unwrap().is_empty());
        }
        assert_eq!(player.current_index(), 4);
        assert_eq!(player.state().values(), &[1, 2]);
        assert!(player.start().unwrap().is_empty());
    }

    #[test]
    fn test_step_back_from_finished_and_refinish_silently() {
        let clock = ManualClock::new();
        let mut player = player_with(PlayerConfig::default().with_stride(2), &clock);
        for _ in 0..4 {
            player.step_forward().unwrap();
        }
        player.step_back().unwrap();
        player.step_back().unwrap();
        assert_eq!(player.run_state(), RunState::Paused);
        assert_eq!(player.current_index(), 2);
        assert_eq!(player.state().values(), &[1, 2]);

        player.step_forward().unwrap();
        let events = player.step_forward().unwrap();
        assert_eq!(player.run_state(), RunState::Finished);
        assert!(!events
            .iter()
            .any(|e| matches!(e, PlayerEvent::Finished(_))));
    }

    #[test]
    fn test_step_back_denied_by_capability() {
        let clock = ManualClock::new();
        let mut player = player_with(PlayerConfig::default().with_step_back(false), &clock);
        player.step_forward().unwrap();

        assert_eq!(
            player.step_back(),
            Err(PlaybackError::UnsupportedOperation {
                capability: Capability::StepBack
            })
        );
        assert_eq!(player.current_index(), 1);
    }

    #[test]
    fn test_seek_within_log() {
        let clock = ManualClock::new();
        let mut player = player_with(PlayerConfig::default().with_stride(2), &clock);
        player.step_forward().unwrap();
        player.step_forward().unwrap();
        player.step_forward().unwrap();

        player.seek(1).unwrap();
        assert_eq!(player.state().values(), &[2, 1]);
        assert_eq!(player.metrics().comparisons, 1);

        assert!(matches!(
            player.seek(9),
            Err(PlaybackError::Replay(ReplayError::IndexOutOfRange { index: 9, len: 3 }))
        ));
    }

    #[test]
    fn test_source_failure_is_terminal_and_distinct() {
        let clock = ManualClock::new();
        let factory: SourceFactory = Box::new(|_: &[i64]| {
            let items = vec![
                Ok(Operation::compare(0, 1)),
                Err(SourceError::new("generator crashed")),
            ];
            Box::new(IterSource::new(items.into_iter())) as Box<dyn Source>
        });
        let mut player = Player::new(
            PlayerConfig::default().with_fps(10),
            vec![2, 1],
            factory,
            Rc::new(clock.clone()),
        )
        .unwrap();

        player.start().unwrap();
        player.tick();
        clock.advance_millis(100);
        let report = player.tick();

        let termination = report.finished().cloned().unwrap();
        assert!(termination.is_failure());
        assert_eq!(player.run_state(), RunState::Finished);
        assert_eq!(player.current_index(), 1);
        match termination {
            Termination::Failed(err) => {
                assert_eq!(err.source_error().map(|e| e.message()), Some("generator crashed"));
            }
            other => panic!("unexpected termination: {other:?}"),
        }
    }

    #[test]
    fn test_sinks_receive_every_advance() {
        let clock = ManualClock::new();
        let mut player = player_with(PlayerConfig::default(), &clock);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink_seen = seen.clone();
        let id = player.add_sink(move |frame: &FrameView<'_>| {
            sink_seen
                .borrow_mut()
                .push((frame.current_index, frame.values().to_vec(), frame.swaps()));
        });

        player.step_forward().unwrap();
        player.step_forward().unwrap();
        assert_eq!(
            *seen.borrow(),
            vec![(1, vec![2, 1], 0), (2, vec![1, 2], 1)]
        );

        assert!(player.remove_sink(id));
        player.step_forward().unwrap();
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let clock = ManualClock::new();
        let mut player = player_with(PlayerConfig::default(), &clock);
        for _ in 0..4 {
            player.step_forward().unwrap();
        }
        let events = player.reset();

        assert!(events.contains(&PlayerEvent::Reset));
        assert_eq!(player.run_state(), RunState::Idle);
        assert_eq!(player.current_index(), 0);
        assert_eq!(player.log().len(), 0);
        assert_eq!(player.termination(), None);
        assert_eq!(player.wall_elapsed(), Duration::ZERO);
        assert_eq!(player.state().values(), &[2, 1]);
    }

    #[test]
    fn test_set_fps_validates() {
        let clock = ManualClock::new();
        let mut player = player_with(PlayerConfig::default(), &clock);
        assert!(player.set_fps(0).is_err());
        assert!(player.set_fps(61).is_err());
        assert_eq!(
            player.set_fps(60).unwrap().as_slice(),
            &[PlayerEvent::FpsChanged { fps: 60 }]
        );
        assert_eq!(player.frames_per_second(), 60);
    }

    #[test]
    fn test_jitter_budget_admits_slightly_early_tick() {
        let clock = ManualClock::new();
        let mut player = player_with(PlayerConfig::default().with_fps(10), &clock);
        player.start().unwrap();
        assert_eq!(player.tick().advanced, 1);

        clock.advance_millis(85);
        assert_eq!(player.tick().advanced, 0);
        clock.advance_millis(10);
        assert_eq!(player.tick().advanced, 1);
        assert_eq!(player.current_index(), 2);
    }

    #[test]
    fn test_zero_jitter_budget_waits_for_frame_boundary() {
        let clock = ManualClock::new();
        let config = PlayerConfig::default()
            .with_fps(10)
            .with_jitter_budget_ms(0);
        let mut player = player_with(config, &clock);
        player.start().unwrap();
        player.tick();

        clock.advance_millis(95);
        assert_eq!(player.tick().advanced, 0);
        clock.advance_millis(5);
        assert_eq!(player.tick().advanced, 1);
    }

    #[test]
    fn test_set_caps_applies_to_next_tick() {
        let clock = ManualClock::new();
        let mut player = player_with(PlayerConfig::default().with_fps(10), &clock);
        player.start().unwrap();
        player.tick();

        assert_eq!(
            player.set_caps(0, 5),
            Err(PlaybackError::Config(ConfigError::ZeroCap {
                name: "per_tick_cap"
            }))
        );
        assert_eq!(player.config().per_tick_cap, 8);

        player.set_caps(1, 1000).unwrap();
        clock.advance_millis(250);
        let report = player.tick();
        assert_eq!(report.due, 2);
        assert_eq!(report.advanced, 1);
        assert_eq!(report.backpressure().map(|bp| bp.reason), Some(CapKind::PerTick));
        assert_eq!(player.config().per_tick_cap, 1);
    }

    #[test]
    fn test_each_start_makes_current_frame_due() {
        let clock = ManualClock::new();
        let mut player = player_with(PlayerConfig::default().with_fps(1), &clock);
        for _ in 0..3 {
            player.start().unwrap();
            assert_eq!(player.tick().advanced, 1);
            player.pause();
        }
        assert_eq!(player.current_index(), 3);
        assert_eq!(player.wall_elapsed(), Duration::ZERO);
    }
}
