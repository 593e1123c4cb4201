use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum IndexError {
    /// The index was never built or loaded.
    #[error("evidence index unavailable: not built or loaded")]
    Unavailable,

    #[error("index build failed: {reason}")]
    Build { reason: String },

    #[error("embedding dimension mismatch: index expects {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("index storage error: {0}")]
    Storage(#[from] StorageError),
}
