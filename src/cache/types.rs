use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::hashing::AnalysisKey;
use crate::pipeline::AnalysisResult;

/// A cached analysis result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Hex form of the [`AnalysisKey`].
    pub key: String,
    pub result: AnalysisResult,
    pub created_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(key: &AnalysisKey, result: AnalysisResult) -> Self {
        Self {
            key: key.to_hex(),
            result,
            created_at: Utc::now(),
        }
    }
}

/// Outcome of [`AnalysisCache::get`](super::AnalysisCache::get).
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    Hit(Box<AnalysisResult>),
    Miss,
}

impl CacheLookup {
    pub fn is_hit(&self) -> bool {
        matches!(self, CacheLookup::Hit(_))
    }

    pub fn into_result(self) -> Option<AnalysisResult> {
        match self {
            CacheLookup::Hit(result) => Some(*result),
            CacheLookup::Miss => None,
        }
    }
}
