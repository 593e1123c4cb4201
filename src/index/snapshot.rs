use std::sync::Arc;

use tracing::{debug, info, warn};

use super::error::IndexError;
use super::types::{BuildReport, RebuildReason, ScoredRecord};
use crate::embedding::EmbeddingProvider;
use crate::embedding::utils::l2_normalize;
use crate::hashing::corpus_fingerprint;
use crate::model::FactCheckRecord;
use crate::storage::{INDEX_FORMAT_VERSION, IndexFile, StoredRecord};

/// An immutable, fully built set of embedded records.
///
/// Snapshots are published whole; a query holds an `Arc` to the one it started with.
#[derive(Debug, Clone)]
pub struct IndexSnapshot {
    records: Vec<Arc<FactCheckRecord>>,
    dim: usize,
    provider_id: String,
    corpus_fingerprint: [u8; 32],
}

impl IndexSnapshot {
    /// Embeds every record's claim and returns the searchable snapshot.
    ///
    /// Blank claims and per-record embedding failures are skipped and counted; a vector of
    /// the wrong length aborts the build.
    pub fn build(
        embedder: &dyn EmbeddingProvider,
        records: Vec<FactCheckRecord>,
    ) -> Result<(Self, BuildReport), IndexError> {
        let dim = embedder.dimension();
        if dim == 0 {
            return Err(IndexError::Build {
                reason: "embedding provider reports dimension 0".to_string(),
            });
        }

        let fingerprint = corpus_fingerprint(&records);
        let mut report = BuildReport::default();
        let mut indexed = Vec::with_capacity(records.len());

        for mut record in records {
            if record.claim.trim().is_empty() {
                warn!(id = record.id, "Skipping fact-check with empty claim");
                report.skipped_empty += 1;
                continue;
            }

            let mut embedding = match embedder.embed(&record.claim) {
                Ok(embedding) => embedding,
                Err(e) => {
                    warn!(id = record.id, error = %e, "Skipping fact-check: embedding failed");
                    report.embedding_failures += 1;
                    continue;
                }
            };

            if embedding.len() != dim {
                return Err(IndexError::DimensionMismatch {
                    expected: dim,
                    actual: embedding.len(),
                });
            }

            l2_normalize(&mut embedding);
            record.embedding = embedding;
            indexed.push(Arc::new(record));
        }

        report.indexed = indexed.len();
        if indexed.is_empty() {
            info!(
                skipped = report.skipped(),
                "Evidence index built empty; queries will return no evidence"
            );
        } else {
            info!(
                indexed = report.indexed,
                skipped = report.skipped(),
                dim,
                "Evidence index built"
            );
        }

        Ok((
            Self {
                records: indexed,
                dim,
                provider_id: embedder.provider_id().to_string(),
                corpus_fingerprint: fingerprint,
            },
            report,
        ))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dim
    }

    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }

    pub fn corpus_fingerprint(&self) -> &[u8; 32] {
        &self.corpus_fingerprint
    }

    pub fn records(&self) -> &[Arc<FactCheckRecord>] {
        &self.records
    }

    /// Up to `k` records by descending inner product with the normalized `query`.
    ///
    /// The sort is stable, so equal scores keep corpus order.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<ScoredRecord> {
        if k == 0 || self.records.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(usize, f32)> = self
            .records
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let dot: f32 = record
                    .embedding
                    .iter()
                    .zip(query)
                    .map(|(a, b)| a * b)
                    .sum();
                let score = if dot.is_nan() { -1.0 } else { dot.clamp(-1.0, 1.0) };
                (i, score)
            })
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(k);

        debug!(
            candidates = self.records.len(),
            returned = scored.len(),
            top_score = scored.first().map(|(_, s)| *s),
            "Index search complete"
        );

        scored
            .into_iter()
            .enumerate()
            .map(|(rank, (i, similarity))| ScoredRecord {
                record: Arc::clone(&self.records[i]),
                similarity,
                rank,
            })
            .collect()
    }

    /// Flattens the snapshot into its persisted form.
    pub fn to_index_file(&self) -> IndexFile {
        let mut vectors = Vec::with_capacity(self.records.len() * self.dim);
        for record in &self.records {
            vectors.extend_from_slice(&record.embedding);
        }

        IndexFile {
            format_version: INDEX_FORMAT_VERSION,
            embedding_dim: self.dim as u32,
            provider_id: self.provider_id.clone(),
            corpus_fingerprint: self.corpus_fingerprint,
            records: self.records.iter().map(|r| StoredRecord::from(r.as_ref())).collect(),
            vectors,
        }
    }

    /// Restores a snapshot, checking it against the current provider.
    pub fn from_index_file(
        file: IndexFile,
        embedder: &dyn EmbeddingProvider,
    ) -> Result<Self, RebuildReason> {
        let dim = file.embedding_dim as usize;

        if !file.is_rectangular() || file.vector_rows() != file.records.len() {
            return Err(RebuildReason::RowCountMismatch {
                records: file.records.len(),
                rows: file.vector_rows(),
            });
        }

        if dim != embedder.dimension() {
            return Err(RebuildReason::DimensionMismatch {
                expected: embedder.dimension(),
                actual: dim,
            });
        }

        if file.provider_id != embedder.provider_id() {
            return Err(RebuildReason::ProviderChanged {
                expected: embedder.provider_id().to_string(),
                found: file.provider_id,
            });
        }

        let mut records = Vec::with_capacity(file.records.len());
        for (stored, row) in file.records.into_iter().zip(file.vectors.chunks_exact(dim)) {
            let record = stored
                .into_record(row.to_vec())
                .map_err(|e| RebuildReason::Corrupt(e.to_string()))?;
            records.push(Arc::new(record));
        }

        Ok(Self {
            records,
            dim,
            provider_id: file.provider_id,
            corpus_fingerprint: file.corpus_fingerprint,
        })
    }
}
