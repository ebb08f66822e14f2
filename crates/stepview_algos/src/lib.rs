//! Stepview Algorithms
//!
//! Reference sources for the playback engine: sorting algorithms that record
//! each comparison, exchange, and write as an operation, and seeded dataset
//! presets to run them on.
//!
//! ```ignore
//! use stepview_algos::{lookup, Preset};
//!
//! let data = Preset::NearlySorted.generate(32, 5, 100, 42)?;
//! let trace = lookup("insertion")?.trace(&data);
//! assert!(trace.replay()?.state.values().windows(2).all(|w| w[0] <= w[1]));
//! ```

pub mod error;
pub mod preset;
pub mod recorder;
pub mod registry;
pub mod sorts;
pub mod source;

pub use error::{AlgoError, Result};
pub use preset::Preset;
pub use recorder::Recorder;
pub use registry::{algorithms, lookup, AlgoInfo, Complexity};
pub use source::AlgoSource;
