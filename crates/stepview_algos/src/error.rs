use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AlgoError {
    #[error("unknown algorithm `{0}`")]
    UnknownAlgorithm(String),

    #[error("unknown dataset preset `{0}`")]
    UnknownPreset(String),

    #[error("invalid value range: min {min} is greater than max {max}")]
    InvalidRange { min: i64, max: i64 },
}

pub type Result<T, E = AlgoError> = std::result::Result<T, E>;
