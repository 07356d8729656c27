//! Error handling

use thiserror::Error;

pub type ScoreResult<T> = Result<T, ScoreError>;

/// Terminal failure of a scoring invocation.
///
/// Every variant aborts the whole batch; nothing is written to stdout.
#[derive(Debug, Error)]
pub enum ScoreError {
    // Input errors
    #[error("invalid input format: {0}")]
    InvalidInputFormat(String),

    #[error("invalid batch shape: {0}")]
    InvalidBatchShape(String),

    #[error("empty batch: at least one record is required")]
    EmptyBatch,

    // Configuration errors
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // Model errors
    #[error("model load error: {0}")]
    ModelLoadError(String),

    #[error("model inference error: {0}")]
    ModelInferenceError(String),
}

impl ScoreError {
    /// Process exit status for this failure
    pub fn exit_code(&self) -> u8 {
        match self {
            ScoreError::InvalidInputFormat(_)
            | ScoreError::InvalidBatchShape(_)
            | ScoreError::EmptyBatch
            | ScoreError::InvalidConfig(_) => 2,
            ScoreError::ModelLoadError(_) | ScoreError::ModelInferenceError(_) => 3,
        }
    }
}

impl From<serde_json::Error> for ScoreError {
    fn from(err: serde_json::Error) -> Self {
        ScoreError::InvalidInputFormat(err.to_string())
    }
}

impl From<std::io::Error> for ScoreError {
    fn from(err: std::io::Error) -> Self {
        ScoreError::InvalidInputFormat(format!("failed to read input: {}", err))
    }
}

impl From<ndarray::ShapeError> for ScoreError {
    fn from(err: ndarray::ShapeError) -> Self {
        ScoreError::InvalidBatchShape(err.to_string())
    }
}
