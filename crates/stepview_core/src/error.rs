use thiserror::Error;

use crate::operation::OpKind;

/// Failure raised by a [`Source`](crate::Source) while producing an operation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("source failed: {message}")]
pub struct SourceError {
    message: String,
}

impl SourceError {
    /// A failure carrying `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The failure message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ReplayError {
    #[error("index {index} is out of range for a log of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("malformed `{kind}` operation: {reason}")]
    MalformedOperation { kind: OpKind, reason: String },

    /// The store had no checkpoint at or before `target`. The index-0 capture
    /// makes this unreachable for a live run.
    #[error("no checkpoint available at or before index {target}")]
    NoCheckpointAvailable { target: usize },

    #[error(transparent)]
    SourceFailure(#[from] SourceError),
}

impl ReplayError {
    pub(crate) fn malformed(kind: OpKind, reason: impl Into<String>) -> Self {
        Self::MalformedOperation {
            kind,
            reason: reason.into(),
        }
    }

    /// Whether the run that produced this error can continue.
    ///
    /// Range errors are recoverable by retrying with a valid index; everything
    /// else terminates the run.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::IndexOutOfRange { .. })
    }
}

pub type Result<T, E = ReplayError> = std::result::Result<T, E>;
