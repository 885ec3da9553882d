//! Engine error types.

use thiserror::Error;

use crate::collaborators::CollaboratorError;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Frame sampling failed: {0}")]
    Sampling(CollaboratorError),

    #[error("Relevance scoring failed: {0}")]
    Scoring(CollaboratorError),

    #[error("None of the {sampled} sampled frames could be scored")]
    NoFramesScored { sampled: usize },
}

impl EngineError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn invalid_policy(msg: impl Into<String>) -> Self {
        Self::InvalidPolicy(msg.into())
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Whether the error stems from what the caller passed in, as opposed
    /// to a failing sampler or scorer.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidInput(_)
                | EngineError::InvalidPolicy(_)
                | EngineError::InvalidRequest(_)
        )
    }
}
