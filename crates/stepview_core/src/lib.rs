//! Stepview Core
//!
//! Deterministic step replay for recorded algorithm runs.
//!
//! # Features
//!
//! - **Operations**: closed, shape-checked records of one event each
//! - **Operation Log**: append-only, index-addressable run history
//! - **Checkpoints**: periodic snapshots that bound seek cost by the stride
//! - **Replay**: pure reconstruction of the state at any index
//! - **Traces**: lossless serialized form of a run

pub mod capability;
pub mod checkpoint;
pub mod error;
pub mod log;
pub mod operation;
pub mod replay;
pub mod session;
pub mod source;
pub mod state;
pub mod trace;

pub use capability::{Capability, CapabilityMap};
pub use checkpoint::{Checkpoint, CheckpointStore, DEFAULT_STRIDE};
pub use error::{ReplayError, Result, SourceError};
pub use log::OperationLog;
pub use operation::{OpKind, Operation, Payload, Positions, RawOperation};
pub use replay::{reconstruct, seek, Reconstruction};
pub use session::{Advance, RunSession};
pub use source::{IterSource, Source, VecSource};
pub use state::{Highlights, Metrics, ReplayState};
pub use trace::Trace;
