use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crate::aggregation::{AggregationConfig, EvaluationConfig, EvidenceAggregator, EvidenceEvaluator};
use crate::cache::AnalysisCache;
use crate::constants::{DEFAULT_MIN_SIMILARITY, DEFAULT_TOP_K};
use crate::embedding::EmbeddingProvider;
use crate::index::EvidenceIndex;
use crate::scoring::{CredibilityScorer, ScoringConfig};
use crate::stance::{StanceClassifier, UnavailableClassifier};

use super::Analyzer;
use super::error::AnalysisError;

/// Assembles an [`Analyzer`] from parts. [`Analyzer::open`] is the config-driven path.
pub struct AnalyzerBuilder {
    index: Arc<EvidenceIndex>,
    classifier: Arc<dyn StanceClassifier>,
    aggregation: AggregationConfig,
    evaluation: EvaluationConfig,
    scoring: ScoringConfig,
    cache: Option<AnalysisCache>,
    top_k: usize,
    min_similarity: f32,
    index_path: Option<PathBuf>,
}

impl AnalyzerBuilder {
    /// Starts from an unbuilt index over `embedder`.
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self::with_index(Arc::new(EvidenceIndex::new(embedder)))
    }

    pub fn with_index(index: Arc<EvidenceIndex>) -> Self {
        Self {
            index,
            classifier: Arc::new(UnavailableClassifier::default()),
            aggregation: AggregationConfig::default(),
            evaluation: EvaluationConfig::default(),
            scoring: ScoringConfig::default(),
            cache: None,
            top_k: DEFAULT_TOP_K,
            min_similarity: DEFAULT_MIN_SIMILARITY,
            index_path: None,
        }
    }

    pub fn classifier(mut self, classifier: Arc<dyn StanceClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn aggregation(mut self, config: AggregationConfig) -> Self {
        self.aggregation = config;
        self
    }

    pub fn evaluation(mut self, config: EvaluationConfig) -> Self {
        self.evaluation = config;
        self
    }

    pub fn scoring(mut self, config: ScoringConfig) -> Self {
        self.scoring = config;
        self
    }

    pub fn cache(mut self, cache: AnalysisCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn min_similarity(mut self, min_similarity: f32) -> Self {
        self.min_similarity = min_similarity;
        self
    }

    /// Where [`Analyzer::rebuild_index`] persists the rebuilt index.
    pub fn index_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.index_path = Some(path.into());
        self
    }

    pub fn build(self) -> Result<Analyzer, AnalysisError> {
        self.aggregation
            .validate()
            .map_err(|reason| AnalysisError::InvalidSettings { reason })?;
        if !(-1.0..=1.0).contains(&self.min_similarity) {
            return Err(AnalysisError::InvalidSettings {
                reason: format!(
                    "min_similarity must be within [-1, 1], got {}",
                    self.min_similarity
                ),
            });
        }

        Ok(Analyzer {
            index: self.index,
            evaluator: EvidenceEvaluator::new(self.classifier, self.evaluation),
            aggregator: EvidenceAggregator::new(self.aggregation),
            scorer: CredibilityScorer::new(self.scoring)?,
            cache: self.cache.unwrap_or_default(),
            top_k: self.top_k,
            min_similarity: self.min_similarity,
            index_path: self.index_path,
            index_status: None,
            closed: AtomicBool::new(false),
        })
    }
}
