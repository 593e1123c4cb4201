use std::path::PathBuf;

use thiserror::Error;

/// Durable cache tier failures. The analyzer logs these and carries on uncached.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cache entry serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("cache entry at {path} is unreadable: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("cache store unavailable: {reason}")]
    Unavailable { reason: String },
}
