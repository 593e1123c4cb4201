use std::sync::Arc;

use moka::sync::Cache;
use tracing::debug;

use super::error::CacheError;
use super::store::CacheStore;
use super::types::{CacheEntry, CacheLookup};
use crate::constants::DEFAULT_CACHE_CAPACITY;
use crate::hashing::AnalysisKey;
use crate::pipeline::AnalysisResult;

/// Memoizes analysis results by [`AnalysisKey`].
///
/// An in-memory `moka` tier sits in front of an optional durable [`CacheStore`]. Durable hits
/// are promoted into memory. Errors from the durable tier are returned to the caller; the
/// memory tier never fails.
pub struct AnalysisCache {
    memory: Cache<AnalysisKey, CacheEntry>,
    store: Option<Arc<dyn CacheStore>>,
}

impl AnalysisCache {
    pub fn new(capacity: u64) -> Self {
        Self {
            memory: Cache::builder().max_capacity(capacity).build(),
            store: None,
        }
    }

    pub fn with_store(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn store_name(&self) -> Option<&str> {
        self.store.as_deref().map(|s| s.name())
    }

    pub async fn get(&self, key: &AnalysisKey) -> Result<CacheLookup, CacheError> {
        if let Some(entry) = self.memory.get(key) {
            debug!(%key, "Analysis cache hit (memory)");
            return Ok(CacheLookup::Hit(Box::new(entry.result)));
        }

        let Some(store) = &self.store else {
            return Ok(CacheLookup::Miss);
        };

        match store.get(key).await? {
            Some(entry) => {
                debug!(%key, store = store.name(), "Analysis cache hit (store)");
                let result = entry.result.clone();
                self.memory.insert(*key, entry);
                Ok(CacheLookup::Hit(Box::new(result)))
            }
            None => Ok(CacheLookup::Miss),
        }
    }

    /// Upserts `result` into both tiers. The memory tier is updated even when the store
    /// write fails.
    pub async fn put(&self, key: &AnalysisKey, result: AnalysisResult) -> Result<(), CacheError> {
        let entry = CacheEntry::new(key, result);
        self.memory.insert(*key, entry.clone());

        if let Some(store) = &self.store {
            store.put(&entry).await?;
        }
        Ok(())
    }

    /// Drops every entry from both tiers.
    pub async fn clear(&self) -> Result<(), CacheError> {
        self.memory.invalidate_all();
        self.memory.run_pending_tasks();

        if let Some(store) = &self.store {
            let removed = store.clear().await?;
            debug!(removed, store = store.name(), "Durable analysis cache cleared");
        }
        Ok(())
    }

    /// Entries in the memory tier (approximate until pending tasks run).
    pub fn len(&self) -> u64 {
        self.memory.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn run_pending_tasks(&self) {
        self.memory.run_pending_tasks();
    }
}

impl Default for AnalysisCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl std::fmt::Debug for AnalysisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisCache")
            .field("entries", &self.memory.entry_count())
            .field("store", &self.store_name())
            .finish()
    }
}
