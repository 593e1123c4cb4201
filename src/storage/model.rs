//! On-disk index layout.

use rkyv::{Archive, Deserialize, Serialize};

use crate::model::{FactCheckRecord, ModelError, Verdict};

/// Bumped whenever [`IndexFile`] changes shape.
pub const INDEX_FORMAT_VERSION: u32 = 1;

/// A corpus record without its embedding (vectors are stored flat in [`IndexFile`]).
#[derive(Archive, Deserialize, Serialize, Debug, PartialEq, Clone)]
pub struct StoredRecord {
    pub id: u64,
    pub claim: String,
    /// Canonical verdict label.
    pub verdict: String,
    pub explanation: String,
    pub source: String,
    pub source_url: Option<String>,
    /// ISO-8601 date.
    pub published: Option<String>,
}

impl From<&FactCheckRecord> for StoredRecord {
    fn from(record: &FactCheckRecord) -> Self {
        Self {
            id: record.id,
            claim: record.claim.clone(),
            verdict: record.verdict.as_str().to_string(),
            explanation: record.explanation.clone(),
            source: record.source.clone(),
            source_url: record.source_url.clone(),
            published: record.published.map(|d| d.format("%Y-%m-%d").to_string()),
        }
    }
}

impl StoredRecord {
    /// Rebuilds the record, attaching `embedding`.
    pub fn into_record(self, embedding: Vec<f32>) -> Result<FactCheckRecord, ModelError> {
        let verdict: Verdict = self.verdict.parse()?;
        let published = match self.published {
            Some(date) => Some(
                chrono::NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                    .map_err(|_| ModelError::InvalidDate { value: date.clone() })?,
            ),
            None => None,
        };

        Ok(FactCheckRecord {
            id: self.id,
            claim: self.claim,
            verdict,
            explanation: self.explanation,
            source: self.source,
            source_url: self.source_url,
            published,
            embedding,
        })
    }
}

/// Persisted evidence index.
///
/// `vectors` holds `records.len() * embedding_dim` floats, row-major, L2-normalized.
#[derive(Archive, Deserialize, Serialize, Debug, PartialEq, Clone)]
pub struct IndexFile {
    pub format_version: u32,
    pub embedding_dim: u32,
    /// Embedding provider that produced `vectors`.
    pub provider_id: String,
    /// BLAKE3 fingerprint of the corpus the index was built from.
    pub corpus_fingerprint: [u8; 32],
    pub records: Vec<StoredRecord>,
    pub vectors: Vec<f32>,
}

impl IndexFile {
    /// Number of embedding rows actually stored.
    pub fn vector_rows(&self) -> usize {
        if self.embedding_dim == 0 {
            0
        } else {
            self.vectors.len() / self.embedding_dim as usize
        }
    }

    /// `true` when the vector buffer is an exact multiple of the dimension.
    pub fn is_rectangular(&self) -> bool {
        self.embedding_dim != 0 && self.vectors.len() % self.embedding_dim as usize == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rkyv::rancor::Error;
    use rkyv::{from_bytes, to_bytes};

    fn sample_record() -> FactCheckRecord {
        FactCheckRecord::new(3, "Vaccines cause autism", Verdict::False)
            .with_explanation("Large cohort studies found no link.")
            .with_source("Reuters", Some("https://www.reuters.com/fact-check/x"))
            .with_published(chrono::NaiveDate::from_ymd_opt(2020, 5, 17).unwrap())
    }

    #[test]
    fn test_stored_record_preserves_fields() {
        let record = sample_record();
        let restored = StoredRecord::from(&record)
            .into_record(vec![0.5, 0.5])
            .unwrap();

        assert_eq!(restored.id, 3);
        assert_eq!(restored.verdict, Verdict::False);
        assert_eq!(restored.published, record.published);
        assert_eq!(restored.source_url, record.source_url);
        assert_eq!(restored.embedding, vec![0.5, 0.5]);
    }

    #[test]
    fn test_stored_record_rejects_bad_verdict() {
        let mut stored = StoredRecord::from(&sample_record());
        stored.verdict = "NOPE".to_string();
        assert!(stored.into_record(vec![]).is_err());
    }

    #[test]
    fn test_index_file_archive() {
        let file = IndexFile {
            format_version: INDEX_FORMAT_VERSION,
            embedding_dim: 2,
            provider_id: "lexical-stub/2".to_string(),
            corpus_fingerprint: [7u8; 32],
            records: vec![StoredRecord::from(&sample_record())],
            vectors: vec![0.6, 0.8],
        };

        let bytes = to_bytes::<Error>(&file).expect("serialize");
        let restored: IndexFile = from_bytes::<IndexFile, Error>(&bytes).expect("deserialize");

        assert_eq!(restored, file);
        assert_eq!(restored.vector_rows(), 1);
        assert!(restored.is_rectangular());
    }

    #[test]
    fn test_ragged_vectors_detected() {
        let file = IndexFile {
            format_version: INDEX_FORMAT_VERSION,
            embedding_dim: 3,
            provider_id: String::new(),
            corpus_fingerprint: [0u8; 32],
            records: vec![],
            vectors: vec![1.0, 0.0, 0.0, 1.0],
        };
        assert!(!file.is_rectangular());
        assert_eq!(file.vector_rows(), 1);
    }
}
