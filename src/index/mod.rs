//! Nearest-neighbour search over embedded fact-checks.
//!
//! The live [`IndexSnapshot`] sits behind a `RwLock<Option<Arc<_>>>`. Builds happen off to
//! the side and are published with a single pointer swap, so queries observe either the
//! previous snapshot or the complete new one.

pub mod error;
pub mod snapshot;
pub mod types;


pub use error::IndexError;
pub use snapshot::IndexSnapshot;
pub use types::{BuildReport, IndexStatus, LoadOutcome, RebuildReason, ScoredRecord};

use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::embedding::EmbeddingProvider;
use crate::embedding::utils::l2_normalize;
use crate::hashing::corpus_fingerprint;
use crate::model::FactCheckRecord;
use crate::storage::{StorageError, read_index_file, write_index_file};

/// Embedded corpus of prior fact-checks.
pub struct EvidenceIndex {
    embedder: Arc<dyn EmbeddingProvider>,
    snapshot: RwLock<Option<Arc<IndexSnapshot>>>,
}

impl std::fmt::Debug for EvidenceIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvidenceIndex")
            .field("provider_id", &self.embedder.provider_id())
            .field("available", &self.is_available())
            .field("records", &self.len())
            .finish()
    }
}

impl EvidenceIndex {
    /// Creates an index with nothing published. Queries fail with
    /// [`IndexError::Unavailable`] until [`build`](Self::build) or [`load`](Self::load).
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            embedder,
            snapshot: RwLock::new(None),
        }
    }

    pub fn embedder(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedder
    }

    /// Current snapshot, if any.
    pub fn snapshot(&self) -> Option<Arc<IndexSnapshot>> {
        self.snapshot.read().clone()
    }

    pub fn is_available(&self) -> bool {
        self.snapshot.read().is_some()
    }

    pub fn len(&self) -> usize {
        self.snapshot.read().as_ref().map_or(0, |s| s.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dimension(&self) -> usize {
        self.embedder.dimension()
    }

    fn publish(&self, snapshot: IndexSnapshot) {
        let records = snapshot.len();
        *self.snapshot.write() = Some(Arc::new(snapshot));
        debug!(records, "Published index snapshot");
    }

    /// Embeds `records` and publishes the result (blocking).
    pub fn build(&self, records: Vec<FactCheckRecord>) -> Result<BuildReport, IndexError> {
        let (snapshot, report) = IndexSnapshot::build(self.embedder.as_ref(), records)?;
        self.publish(snapshot);
        Ok(report)
    }

    /// Runs [`build`](Self::build) on the blocking pool. Queries keep using the previous
    /// snapshot until the new one is complete.
    pub fn rebuild_in_background(
        self: &Arc<Self>,
        records: Vec<FactCheckRecord>,
    ) -> JoinHandle<Result<BuildReport, IndexError>> {
        let index = Arc::clone(self);
        info!(records = records.len(), "Starting background index rebuild");
        tokio::task::spawn_blocking(move || index.build(records))
    }

    /// Up to `k` records most similar to `text`, by descending cosine similarity.
    pub fn query(&self, text: &str, k: usize) -> Result<Vec<ScoredRecord>, IndexError> {
        let snapshot = self.snapshot().ok_or(IndexError::Unavailable)?;
        if k == 0 || snapshot.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = self.embedder.embed(text)?;
        if query.len() != snapshot.dimension() {
            return Err(IndexError::DimensionMismatch {
                expected: snapshot.dimension(),
                actual: query.len(),
            });
        }
        l2_normalize(&mut query);

        Ok(snapshot.search(&query, k))
    }

    /// Like [`query`](Self::query), but an unavailable or failing index yields no evidence.
    pub fn query_or_empty(&self, text: &str, k: usize) -> Vec<ScoredRecord> {
        match self.query(text, k) {
            Ok(hits) => hits,
            Err(IndexError::Unavailable) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Index query failed, continuing without retrieved evidence");
                Vec::new()
            }
        }
    }

    /// Writes the live snapshot to `path` atomically.
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub fn persist(&self, path: &Path) -> Result<(), IndexError> {
        let snapshot = self.snapshot().ok_or(IndexError::Unavailable)?;
        write_index_file(path, &snapshot.to_index_file())?;
        info!(records = snapshot.len(), "Evidence index persisted");
        Ok(())
    }

    /// Loads a persisted snapshot, checking it against the current embedding provider.
    pub fn load(&self, path: &Path) -> Result<LoadOutcome, IndexError> {
        self.load_checked(path, None)
    }

    /// Like [`load`](Self::load), also requiring the file to match `corpus`.
    pub fn load_for_corpus(
        &self,
        path: &Path,
        corpus: &[FactCheckRecord],
    ) -> Result<LoadOutcome, IndexError> {
        self.load_checked(path, Some(corpus_fingerprint(corpus)))
    }

    fn load_checked(
        &self,
        path: &Path,
        expected_fingerprint: Option<[u8; 32]>,
    ) -> Result<LoadOutcome, IndexError> {
        let file = match read_index_file(path) {
            Ok(file) => file,
            Err(StorageError::NotFound { .. }) => {
                return Ok(LoadOutcome::RebuildRequired(RebuildReason::Missing));
            }
            Err(e @ (StorageError::Corrupt { .. } | StorageError::UnsupportedVersion { .. })) => {
                return Ok(LoadOutcome::RebuildRequired(RebuildReason::Corrupt(
                    e.to_string(),
                )));
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(expected) = expected_fingerprint
            && file.corpus_fingerprint != expected
        {
            return Ok(LoadOutcome::RebuildRequired(RebuildReason::CorpusChanged));
        }

        match IndexSnapshot::from_index_file(file, self.embedder.as_ref()) {
            Ok(snapshot) => {
                let records = snapshot.len();
                self.publish(snapshot);
                info!(path = %path.display(), records, "Evidence index loaded");
                Ok(LoadOutcome::Loaded { records })
            }
            Err(reason) => Ok(LoadOutcome::RebuildRequired(reason)),
        }
    }

    /// Loads the index from `path`, or rebuilds it from `corpus` and re-persists it when the
    /// file is missing, unreadable or stale.
    #[instrument(skip(self, path, corpus), fields(path = %path.display(), corpus = corpus.len()))]
    pub fn load_or_build(
        &self,
        path: &Path,
        corpus: Vec<FactCheckRecord>,
    ) -> Result<IndexStatus, IndexError> {
        let reason = match self.load_for_corpus(path, &corpus)? {
            LoadOutcome::Loaded { records } => return Ok(IndexStatus::Loaded { records }),
            LoadOutcome::RebuildRequired(reason) => reason,
        };

        info!(%reason, "Rebuilding evidence index");
        let report = self.build(corpus)?;
        self.persist(path)?;

        Ok(IndexStatus::Rebuilt { reason, report })
    }
}
