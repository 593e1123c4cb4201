//! CredLens library crate (used by the CLI and integration tests).
//!
//! Verifies a factual claim against a corpus of prior fact-checks:
//!
//! 1. [`EvidenceIndex`] retrieves semantically similar records.
//! 2. [`EvidenceEvaluator`] classifies each one (and any supplied evidence) through a
//!    [`StanceClassifier`], falling back to a deterministic heuristic.
//! 3. [`EvidenceAggregator`] weighs the evidence into a [`Verdict`] and explanation.
//! 4. [`CredibilityScorer`] computes a [`CredibilityFingerprint`].
//! 5. [`AnalysisCache`] memoizes the result per canonicalized input.
//!
//! [`Analyzer`] wires these together behind `analyze()`.
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod aggregation;
pub mod cache;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod hashing;
pub mod index;
pub mod model;
pub mod pipeline;
pub mod scoring;
pub mod stance;
pub mod storage;

pub use aggregation::{
    Aggregation, AggregationConfig, Candidate, EvaluationConfig, Evaluation, EvidenceAggregator,
    EvidenceEvaluator,
};
#[cfg(any(test, feature = "mock"))]
pub use cache::{FailingCacheStore, MemoryCacheStore};
pub use cache::{AnalysisCache, CacheEntry, CacheError, CacheLookup, CacheStore, FileCacheStore};
pub use config::{Config, ConfigError};
pub use embedding::{EmbeddingError, EmbeddingProvider, SentenceConfig, SentenceEmbedder};
pub use hashing::{AnalysisKey, analysis_key, canonicalize_input};
pub use index::{BuildReport, EvidenceIndex, IndexError, IndexStatus, LoadOutcome, ScoredRecord};
pub use model::{
    Corpus, CorpusError, EvidenceItem, FactCheckRecord, ModelError, Stance, StanceOrigin,
    SuppliedEvidence, Verdict, VerificationMethod,
};
pub use pipeline::{AnalysisError, AnalysisRequest, AnalysisResult, Analyzer, Degradation};
pub use scoring::{
    CredibilityFingerprint, CredibilityLevel, CredibilityScorer, ScoringConfig, SourceCategory,
    SourceProfile, SuspiciousPhrase,
};
#[cfg(any(test, feature = "mock"))]
pub use stance::MockStanceClassifier;
pub use stance::{NliClassifier, StanceClassifier, StanceError, StanceJudgement};
pub use storage::StorageError;
