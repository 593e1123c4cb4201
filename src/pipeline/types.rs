use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{EvidenceItem, SuppliedEvidence, Verdict};
use crate::scoring::{CredibilityFingerprint, CredibilityLevel, SourceProfile, SuspiciousPhrase};

/// One claim to analyse.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub claim: String,
    #[serde(default)]
    pub source_url: Option<String>,
    /// Evidence gathered by the caller, evaluated next to the retrieved records.
    #[serde(default)]
    pub evidence: Vec<SuppliedEvidence>,
}

impl AnalysisRequest {
    pub fn new(claim: impl Into<String>) -> Self {
        Self {
            claim: claim.into(),
            ..Default::default()
        }
    }

    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    pub fn with_evidence(mut self, evidence: SuppliedEvidence) -> Self {
        self.evidence.push(evidence);
        self
    }
}

/// A path on which the analysis ran with reduced fidelity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Degradation {
    /// At least one stance came from the heuristic.
    HeuristicStance,
    /// Evaluation stopped before every candidate was classified.
    BudgetExpired,
    /// The durable result cache could not be read or written.
    CacheUnavailable,
    /// The index query failed; only supplied evidence was considered.
    RetrievalFailed,
}

impl Degradation {
    pub fn note(&self) -> &'static str {
        match self {
            Degradation::HeuristicStance => "evidence classification unavailable; heuristic used",
            Degradation::BudgetExpired => "analysis budget expired",
            Degradation::CacheUnavailable => "result cache unavailable",
            Degradation::RetrievalFailed => "evidence retrieval failed",
        }
    }
}

impl std::fmt::Display for Degradation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.note())
    }
}

/// Outcome of one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub analysis_id: Uuid,
    /// Claim as analysed (whitespace-normalized).
    pub claim: String,
    pub source_url: Option<String>,
    pub verdict: Verdict,
    /// Aggregation confidence in `[0, 1]`.
    pub confidence: f32,
    pub fingerprint: CredibilityFingerprint,
    pub credibility_level: CredibilityLevel,
    /// Evidence in evaluation order: retrieved records by rank, then supplied evidence.
    pub evidence: Vec<EvidenceItem>,
    pub explanation: String,
    pub cited_sources: Vec<String>,
    pub suspicious_phrases: Vec<SuspiciousPhrase>,
    /// Profile of `source_url`, when one was given.
    pub source: Option<SourceProfile>,
    pub degraded: Vec<Degradation>,
    pub analyzed_at: DateTime<Utc>,
}

impl AnalysisResult {
    pub fn is_degraded(&self) -> bool {
        !self.degraded.is_empty()
    }
}
