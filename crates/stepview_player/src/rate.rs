//! Per-tick and per-second work caps.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

const WINDOW: Duration = Duration::from_secs(1);

/// Which cap stopped a tick short.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapKind {
    PerTick,
    PerSecond,
}

/// Tracks advances over a rolling one-second window.
///
/// Holds one timestamp per advance inside the window, so memory is bounded
/// by the per-second cap.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    per_tick: u64,
    per_second: u64,
    window: VecDeque<Instant>,
}

impl RateLimiter {
    /// A limiter with an empty window.
    pub fn new(per_tick: u32, per_second: u32) -> Self {
        Self {
            per_tick: u64::from(per_tick.max(1)),
            per_second: u64::from(per_second.max(1)),
            window: VecDeque::with_capacity(per_second.max(1) as usize),
        }
    }

    /// Operations allowed in one tick.
    pub fn per_tick(&self) -> u64 {
        self.per_tick
    }

    /// Operations allowed in any one-second window.
    pub fn per_second(&self) -> u64 {
        self.per_second
    }

    fn evict(&mut self, now: Instant) {
        while let Some(&oldest) = self.window.front() {
            if now.saturating_duration_since(oldest) >= WINDOW {
                self.window.pop_front();
            } else {
                break;
            }
        }
    }

    /// Advances still allowed in the window ending at `now`.
    pub fn remaining_in_window(&mut self, now: Instant) -> u64 {
        self.evict(now);
        self.per_second.saturating_sub(self.window.len() as u64)
    }

    /// How many of `due` operations one tick at `now` may perform, and the
    /// cap that binds if it is fewer than `due`.
    pub fn allowance(&mut self, now: Instant, due: u64) -> (u64, Option<CapKind>) {
        let window_left = self.remaining_in_window(now);
        let allowed = due.min(self.per_tick).min(window_left);
        let binding = if allowed >= due {
            None
        } else if window_left < self.per_tick.min(due) {
            Some(CapKind::PerSecond)
        } else {
            Some(CapKind::PerTick)
        };
        (allowed, binding)
    }

    /// Record one advance at `now`.
    pub fn record(&mut self, now: Instant) {
        self.window.push_back(now);
    }

    /// Change both caps. Advances already in the window still count.
    pub fn set_caps(&mut self, per_tick: u32, per_second: u32) {
        self.per_tick = u64::from(per_tick.max(1));
        self.per_second = u64::from(per_second.max(1));
    }

    /// Forget the window.
    pub fn clear(&mut self) {
        self.window.clear();
    }
}
