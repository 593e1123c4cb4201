use thiserror::Error;

use crate::cache::CacheError;
use crate::config::ConfigError;
use crate::embedding::EmbeddingError;
use crate::index::IndexError;
use crate::model::{CorpusError, ModelError};
use crate::scoring::ScoringError;
use crate::stance::StanceError;

/// Failures surfaced by the [`Analyzer`](super::Analyzer).
///
/// Setup errors come from `open`. Once open, `analyze` only fails on bad input, an index
/// that was never built, or a closed analyzer; every other problem degrades the result.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("corpus error: {0}")]
    Corpus(#[from] CorpusError),

    #[error("embedding setup failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("stance classifier setup failed: {0}")]
    Stance(#[from] StanceError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error("scorer setup failed: {0}")]
    Scoring(#[from] ScoringError),

    #[error("cache setup failed: {0}")]
    Cache(#[from] CacheError),

    #[error("invalid analyzer settings: {reason}")]
    InvalidSettings { reason: String },

    #[error("claim text is empty")]
    EmptyClaim,

    #[error("supplied evidence #{index} is invalid: {source}")]
    InvalidEvidence {
        index: usize,
        #[source]
        source: ModelError,
    },

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("analyzer is closed")]
    Closed,
}
