use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("invalid scoring config: {reason}")]
    InvalidConfig { reason: String },

    #[error("failed to compile language pattern: {0}")]
    Pattern(#[from] regex::Error),
}
