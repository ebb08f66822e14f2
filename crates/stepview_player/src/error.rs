use stepview_core::{Capability, ReplayError, SourceError};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("checkpoint stride must be a positive integer")]
    ZeroStride,

    #[error("frames per second must be within {min}..={max}, got {fps}")]
    FpsOutOfRange { fps: u32, min: u32, max: u32 },

    #[error("`{name}` must be a positive integer")]
    ZeroCap { name: &'static str },

    #[error("jitter budget must be below one second, got {millis}ms")]
    JitterTooLarge { millis: u64 },
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PlaybackError {
    #[error(transparent)]
    Replay(#[from] ReplayError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("`{capability}` is not supported by this player")]
    UnsupportedOperation { capability: Capability },
}

impl PlaybackError {
    /// Whether this error ended the run.
    pub fn is_fatal(&self) -> bool {
        match self {
            PlaybackError::Replay(err) => err.is_fatal(),
            PlaybackError::Config(_) | PlaybackError::UnsupportedOperation { .. } => false,
        }
    }

    /// The underlying source failure, if this error is one.
    pub fn source_error(&self) -> Option<&SourceError> {
        match self {
            PlaybackError::Replay(ReplayError::SourceFailure(err)) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T, E = PlaybackError> = std::result::Result<T, E>;
