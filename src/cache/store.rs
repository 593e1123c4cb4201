use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use super::error::CacheError;
use super::types::CacheEntry;
use crate::hashing::AnalysisKey;

const ENTRY_EXTENSION: &str = "json";

/// Durable tier behind the in-memory cache.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &AnalysisKey) -> Result<Option<CacheEntry>, CacheError>;

    /// Upsert; the last write for a key wins.
    async fn put(&self, entry: &CacheEntry) -> Result<(), CacheError>;

    /// Removes every entry and returns how many were removed.
    async fn clear(&self) -> Result<usize, CacheError>;

    fn name(&self) -> &str;
}

/// One JSON file per key under a directory.
///
/// Writes go to a temporary file in the same directory and are renamed into place, so a
/// reader never sees a partial entry.
#[derive(Debug, Clone)]
pub struct FileCacheStore {
    dir: PathBuf,
}

impl FileCacheStore {
    /// Uses `dir`, creating it if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| CacheError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, hex: &str) -> Result<PathBuf, CacheError> {
        if hex.len() != 64 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(CacheError::Corrupt {
                path: self.dir.clone(),
                reason: format!("invalid cache key '{hex}'"),
            });
        }
        Ok(self.dir.join(format!("{hex}.{ENTRY_EXTENSION}")))
    }
}

#[async_trait]
impl CacheStore for FileCacheStore {
    async fn get(&self, key: &AnalysisKey) -> Result<Option<CacheEntry>, CacheError> {
        let hex = key.to_hex();
        let path = self.path_for(&hex)?;

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(CacheError::Io { path, source }),
        };

        let entry: CacheEntry =
            serde_json::from_slice(&bytes).map_err(|e| CacheError::Corrupt {
                path: path.clone(),
                reason: e.to_string(),
            })?;
        if entry.key != hex {
            return Err(CacheError::Corrupt {
                path,
                reason: format!("entry is keyed '{}'", entry.key),
            });
        }

        Ok(Some(entry))
    }

    async fn put(&self, entry: &CacheEntry) -> Result<(), CacheError> {
        let path = self.path_for(&entry.key)?;
        let bytes = serde_json::to_vec(entry)?;

        let tmp = self
            .dir
            .join(format!(".{}.{}.tmp", entry.key, Uuid::new_v4().simple()));
        if let Err(source) = tokio::fs::write(&tmp, &bytes).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(CacheError::Io { path: tmp, source });
        }
        if let Err(source) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(CacheError::Io { path, source });
        }

        debug!(key = %entry.key, bytes = bytes.len(), "Cache entry written");
        Ok(())
    }

    async fn clear(&self) -> Result<usize, CacheError> {
        let mut dir = match tokio::fs::read_dir(&self.dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(source) => {
                return Err(CacheError::Io {
                    path: self.dir.clone(),
                    source,
                });
            }
        };

        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source: std::io::Error| CacheError::Io { path, source }
        };

        let mut removed = 0;
        while let Some(file) = dir.next_entry().await.map_err(io_err(&self.dir))? {
            let path = file.path();
            let is_entry = path.extension().is_some_and(|ext| ext == ENTRY_EXTENSION);
            let is_tmp = path.extension().is_some_and(|ext| ext == "tmp");
            if !(is_entry || is_tmp) {
                continue;
            }
            tokio::fs::remove_file(&path).await.map_err(io_err(&path))?;
            if is_entry {
                removed += 1;
            }
        }

        Ok(removed)
    }

    fn name(&self) -> &str {
        "file"
    }
}
