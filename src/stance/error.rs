use thiserror::Error;

use crate::embedding::EmbeddingError;

#[derive(Debug, Error)]
pub enum StanceError {
    #[error("stance classifier unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("failed to load NLI model: {reason}")]
    ModelLoadFailed { reason: String },

    #[error("NLI inference failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("tokenization failed: {reason}")]
    TokenizationFailed { reason: String },

    #[error("invalid NLI configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl From<candle_core::Error> for StanceError {
    fn from(err: candle_core::Error) -> Self {
        StanceError::InferenceFailed {
            reason: err.to_string(),
        }
    }
}

impl From<EmbeddingError> for StanceError {
    fn from(err: EmbeddingError) -> Self {
        match err {
            EmbeddingError::TokenizationFailed { reason } => {
                StanceError::TokenizationFailed { reason }
            }
            EmbeddingError::InferenceFailed { reason } => StanceError::InferenceFailed { reason },
            EmbeddingError::InvalidConfig { reason } => StanceError::InvalidConfig { reason },
            other => StanceError::ModelLoadFailed {
                reason: other.to_string(),
            },
        }
    }
}
