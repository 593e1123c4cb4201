//! Analysis result cache: an in-memory `moka` tier over an optional durable store.

pub mod analysis;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod store;
pub mod types;

#[cfg(test)]
mod tests;

pub use analysis::AnalysisCache;
pub use error::CacheError;
#[cfg(any(test, feature = "mock"))]
pub use mock::{FailingCacheStore, MemoryCacheStore};
pub use store::{CacheStore, FileCacheStore};
pub use types::{CacheEntry, CacheLookup};
