use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::model::FactCheckRecord;

/// One query hit.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRecord {
    pub record: Arc<FactCheckRecord>,
    /// Cosine similarity in `[-1, 1]`.
    pub similarity: f32,
    /// Zero-based position in the result list.
    pub rank: usize,
}

/// Counts from one index build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    /// Records embedded and searchable.
    pub indexed: usize,
    /// Records skipped because their claim was blank.
    pub skipped_empty: usize,
    /// Records skipped because embedding failed.
    pub embedding_failures: usize,
    /// Corpus entries dropped before indexing (malformed or duplicate).
    pub rejected: usize,
}

impl BuildReport {
    pub fn skipped(&self) -> usize {
        self.skipped_empty + self.embedding_failures + self.rejected
    }
}

/// Why a persisted index cannot be used as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RebuildReason {
    Missing,
    Corrupt(String),
    RowCountMismatch { records: usize, rows: usize },
    DimensionMismatch { expected: usize, actual: usize },
    ProviderChanged { expected: String, found: String },
    CorpusChanged,
}

impl fmt::Display for RebuildReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("no persisted index"),
            Self::Corrupt(reason) => write!(f, "persisted index unreadable: {reason}"),
            Self::RowCountMismatch { records, rows } => {
                write!(f, "{rows} embedding rows for {records} records")
            }
            Self::DimensionMismatch { expected, actual } => {
                write!(f, "dimension {actual} does not match provider dimension {expected}")
            }
            Self::ProviderChanged { expected, found } => {
                write!(f, "built by '{found}', current provider is '{expected}'")
            }
            Self::CorpusChanged => f.write_str("corpus changed since the index was built"),
        }
    }
}

/// Result of [`EvidenceIndex::load`](super::EvidenceIndex::load).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The persisted snapshot is now live.
    Loaded { records: usize },
    /// Nothing was published; the caller should rebuild.
    RebuildRequired(RebuildReason),
}

/// Result of [`EvidenceIndex::load_or_build`](super::EvidenceIndex::load_or_build).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexStatus {
    Loaded { records: usize },
    Rebuilt {
        reason: RebuildReason,
        report: BuildReport,
    },
}
