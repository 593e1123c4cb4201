//! BLAKE3 keys and fingerprints.

use blake3::Hasher;
use serde_json::{Value, json};

use crate::model::{FactCheckRecord, SuppliedEvidence};

/// 256-bit key identifying one canonicalized analysis input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnalysisKey(pub [u8; 32]);

impl AnalysisKey {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        blake3::Hash::from_bytes(self.0).to_hex().to_string()
    }
}

impl std::fmt::Display for AnalysisKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Collapses runs of whitespace to a single space and trims the ends. Case is preserved.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonical JSON for `{text, url, evidence}`.
///
/// Object keys are emitted in sorted order (`serde_json::Map` is a `BTreeMap`), so two inputs
/// that differ only in field order or whitespace produce the same string.
pub fn canonicalize_input(text: &str, url: Option<&str>, evidence: &[SuppliedEvidence]) -> String {
    let url = url.map(str::trim).filter(|u| !u.is_empty());
    let evidence: Vec<Value> = evidence
        .iter()
        .map(|e| serde_json::to_value(e).unwrap_or(Value::Null))
        .collect();

    json!({
        "text": normalize_whitespace(text),
        "url": url,
        "evidence": evidence,
    })
    .to_string()
}

/// Cache key for an analysis input. Read and write paths both go through here.
#[inline]
pub fn analysis_key(text: &str, url: Option<&str>, evidence: &[SuppliedEvidence]) -> AnalysisKey {
    AnalysisKey(*blake3::hash(canonicalize_input(text, url, evidence).as_bytes()).as_bytes())
}

/// Computes a 64-bit hash of the input data using BLAKE3, truncated from 256 bits.
///
/// Used for bucketing (the lexical stub embedder), never for identity.
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[0..8]);
    u64::from_le_bytes(bytes)
}

/// Fingerprint of a corpus: ids, claims and verdicts in order.
///
/// Stored alongside a persisted index; a mismatch on load means the index is stale.
pub fn corpus_fingerprint(records: &[FactCheckRecord]) -> [u8; 32] {
    let mut hasher = Hasher::new();
    hasher.update(&(records.len() as u64).to_le_bytes());
    for record in records {
        hasher.update(&record.id.to_le_bytes());
        hasher.update(&(record.claim.len() as u64).to_le_bytes());
        hasher.update(record.claim.as_bytes());
        hasher.update(b"|");
        hasher.update(record.verdict.as_str().as_bytes());
    }
    *hasher.finalize().as_bytes()
}
