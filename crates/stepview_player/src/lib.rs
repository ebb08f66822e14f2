//! Stepview Playback
//!
//! Frame-accurate playback of recorded runs.
//!
//! # Features
//!
//! - **Player**: transport (start, pause, step, seek, reset) over a single run
//! - **Dual Clocks**: pausable wall time next to host-independent logical time
//! - **Rate Limiting**: per-tick and per-second caps with backpressure signals
//! - **Comparison**: one set of commands fanned out to two independent players
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use stepview_player::{source_factory, ManualClock, Player, PlayerConfig};
//!
//! let clock = ManualClock::new();
//! let mut player = Player::new(
//!     PlayerConfig::default().with_fps(30),
//!     vec![5, 2, 8, 1, 9],
//!     source_factory(|data| my_source(data)),
//!     Rc::new(clock.clone()),
//! )?;
//!
//! player.start()?;
//! while player.termination().is_none() {
//!     player.tick();
//!     clock.advance_millis(33);
//! }
//! ```

pub mod clock;
pub mod comparison;
pub mod config;
pub mod error;
pub mod event;
pub mod player;
pub mod rate;

pub use clock::{logical_elapsed, Clock, ManualClock, Stopwatch, SystemClock};
pub use comparison::{Broadcast, ComparisonController, Outcome, PairReport, Side};
pub use config::{PlayerConfig, MAX_FPS, MIN_FPS};
pub use error::{ConfigError, PlaybackError, Result};
pub use event::{
    Backpressure, Events, FrameSink, FrameView, PlaybackSnapshot, PlayerEvent, RunState,
    Termination, TickReport,
};
pub use player::{source_factory, Player, SinkId, SourceFactory};
pub use rate::{CapKind, RateLimiter};
