//! Wall and logical clocks.
//!
//! Wall time comes from an injected [`Clock`] and is accumulated by a
//! pausable [`Stopwatch`]. Logical time is computed from the operation index
//! and frame rate alone, so it is identical on every host.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Monotonic time source.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// The host's monotonic clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same time. Used for tests and headless simulation.
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    /// A clock frozen at the current instant until advanced.
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    /// Move time forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        self.now.set(self.now.get() + delta);
    }

    /// Advance by whole milliseconds.
    pub fn advance_millis(&self, millis: u64) {
        self.advance(Duration::from_millis(millis));
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// Accumulates running time, excluding paused intervals.
#[derive(Clone, Copy, Debug, Default)]
pub struct Stopwatch {
    accumulated: Duration,
    started_at: Option<Instant>,
}

impl Stopwatch {
    /// A stopped stopwatch with nothing accumulated.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether time is currently accumulating.
    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Start or resume. No-op if already running.
    pub fn start(&mut self, now: Instant) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    /// Fold the current running interval into the total and stop.
    pub fn pause(&mut self, now: Instant) {
        if let Some(started) = self.started_at.take() {
            self.accumulated += now.saturating_duration_since(started);
        }
    }

    /// Stop and discard accumulated time.
    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
        self.started_at = None;
    }

    /// Total running time as of `now`.
    pub fn elapsed(&self, now: Instant) -> Duration {
        match self.started_at {
            Some(started) => self.accumulated + now.saturating_duration_since(started),
            None => self.accumulated,
        }
    }
}

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Logical time of `index` operations at `fps`: `index / fps` seconds.
pub fn logical_elapsed(index: usize, fps: u32) -> Duration {
    let fps = u128::from(fps.max(1));
    let nanos = (index as u128) * NANOS_PER_SEC / fps;
    Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
}

/// Number of frame slots at `fps` whose start time lies within `elapsed`.
///
/// Slot 0 starts at zero, so this is `floor(elapsed * fps) + 1`.
pub fn frames_within(elapsed: Duration, fps: u32) -> u64 {
    let slots = elapsed.as_nanos() * u128::from(fps) / NANOS_PER_SEC;
    u64::try_from(slots).unwrap_or(u64::MAX - 1) + 1
}
