//! Cross-cutting, shared constants.
//!
//! Thresholds that more than one module needs to agree on live here so the aggregator,
//! scorer and pipeline read the same numbers.
//!
//! The embedding dimension is fixed per deployment. The persisted index records the
//! dimension it was built with and is rebuilt when the loaded embedder disagrees.

/// Output dimension of the default sentence embedder (MiniLM-class BERT).
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Max tokens fed to the sentence embedder.
pub const DEFAULT_MAX_SEQ_LEN: usize = 256;

/// Max tokens fed to the NLI classifier (premise + hypothesis).
pub const DEFAULT_NLI_MAX_SEQ_LEN: usize = 512;

/// Number of corpus records retrieved per analysis.
pub const DEFAULT_TOP_K: usize = 5;

/// Retrieved records below this cosine similarity are not treated as evidence.
pub const DEFAULT_MIN_SIMILARITY: f32 = 0.25;

/// Reliability above which an item counts towards corroboration/contradiction.
pub const DEFAULT_TRUST_THRESHOLD: f32 = 70.0;

/// Classification calls in flight per analysis (1 = sequential).
pub const DEFAULT_CLASSIFY_CONCURRENCY: usize = 1;

/// Per-analysis cancellation budget.
pub const DEFAULT_ANALYSIS_TIMEOUT_MS: u64 = 30_000;

/// Max entries in the in-memory analysis cache.
pub const DEFAULT_CACHE_CAPACITY: u64 = 10_000;

/// Neutral score used wherever there is no evidence to speak from.
pub const NEUTRAL_SCORE: f32 = 50.0;

/// Reliability assigned to sources the domain table does not know.
pub const UNKNOWN_SOURCE_TRUST: f32 = 45.0;

/// Upper bound of every 0–100 score.
pub const MAX_SCORE: f32 = 100.0;
