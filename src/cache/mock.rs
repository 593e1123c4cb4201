//! In-memory and failing [`CacheStore`]s for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::error::CacheError;
use super::store::CacheStore;
use super::types::CacheEntry;
use crate::hashing::AnalysisKey;

/// Keeps entries in a map and counts calls.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: Mutex<HashMap<String, CacheEntry>>,
    gets: AtomicUsize,
    puts: AtomicUsize,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &AnalysisKey) -> Result<Option<CacheEntry>, CacheError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        Ok(self.entries.lock().get(&key.to_hex()).cloned())
    }

    async fn put(&self, entry: &CacheEntry) -> Result<(), CacheError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.entries.lock().insert(entry.key.clone(), entry.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<usize, CacheError> {
        let mut entries = self.entries.lock();
        let removed = entries.len();
        entries.clear();
        Ok(removed)
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Fails every call.
#[derive(Debug, Default)]
pub struct FailingCacheStore;

impl FailingCacheStore {
    fn error() -> CacheError {
        CacheError::Unavailable {
            reason: "store offline".to_string(),
        }
    }
}

#[async_trait]
impl CacheStore for FailingCacheStore {
    async fn get(&self, _key: &AnalysisKey) -> Result<Option<CacheEntry>, CacheError> {
        Err(Self::error())
    }

    async fn put(&self, _entry: &CacheEntry) -> Result<(), CacheError> {
        Err(Self::error())
    }

    async fn clear(&self) -> Result<usize, CacheError> {
        Err(Self::error())
    }

    fn name(&self) -> &str {
        "failing"
    }
}
