use crate::types::FEATURE_DIMENSION;

#[derive(Debug, thiserror::Error)]
pub enum RecallError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("weight vector must have {expected} elements, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("store error: {0}")]
    Store(String),
}

impl RecallError {
    pub fn dimension_mismatch(actual: usize) -> Self {
        Self::DimensionMismatch {
            expected: FEATURE_DIMENSION,
            actual,
        }
    }
}

impl From<std::io::Error> for RecallError {
    fn from(err: std::io::Error) -> Self {
        Self::Store(err.to_string())
    }
}

impl From<serde_json::Error> for RecallError {
    fn from(err: serde_json::Error) -> Self {
        Self::Store(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RecallError>;
