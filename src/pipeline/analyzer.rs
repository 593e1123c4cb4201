use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::builder::AnalyzerBuilder;
use super::error::AnalysisError;
use super::types::{AnalysisRequest, AnalysisResult, Degradation};
use crate::aggregation::{
    AggregationConfig, Candidate, EvaluationConfig, EvidenceAggregator, EvidenceEvaluator,
};
use crate::cache::{AnalysisCache, CacheLookup, FileCacheStore};
use crate::config::Config;
use crate::embedding::{EmbeddingProvider, SentenceConfig, SentenceEmbedder};
use crate::hashing::{analysis_key, normalize_whitespace};
use crate::index::{BuildReport, EvidenceIndex, IndexError, IndexStatus, ScoredRecord};
use crate::model::{Corpus, CorpusError, FactCheckRecord, load_corpus};
use crate::scoring::{CredibilityScorer, ScoringConfig, source_profile};
use crate::stance::{NliConfig, load_classifier};

/// The retrieve → classify → aggregate → score → cache pipeline.
///
/// An explicit context: create it with [`Analyzer::open`] (or [`Analyzer::builder`]), share it
/// behind an `Arc`, and [`close`](Analyzer::close) it when done. Every component it holds is
/// `Send + Sync`, so concurrent analyses need no extra locking.
pub struct Analyzer {
    pub(super) index: Arc<EvidenceIndex>,
    pub(super) evaluator: EvidenceEvaluator,
    pub(super) aggregator: EvidenceAggregator,
    pub(super) scorer: CredibilityScorer,
    pub(super) cache: AnalysisCache,
    pub(super) top_k: usize,
    pub(super) min_similarity: f32,
    pub(super) index_path: Option<PathBuf>,
    pub(super) index_status: Option<IndexStatus>,
    pub(super) closed: AtomicBool,
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("index", &self.index)
            .field("evaluator", &self.evaluator)
            .field("cache", &self.cache)
            .field("top_k", &self.top_k)
            .field("min_similarity", &self.min_similarity)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Analyzer {
    pub fn builder(embedder: Arc<dyn EmbeddingProvider>) -> AnalyzerBuilder {
        AnalyzerBuilder::new(embedder)
    }

    /// Loads models, corpus and index as `config` describes.
    ///
    /// The persisted index is reused when it matches the corpus and embedder; otherwise it is
    /// rebuilt and re-persisted. Without a corpus, or with one that is not a JSON array, the
    /// index is empty but usable; individual bad entries are skipped.
    #[instrument(skip(config), fields(storage = %config.storage_path.display()))]
    pub async fn open(config: &Config) -> Result<Self, AnalysisError> {
        config.validate()?;

        let embedder = Arc::new(SentenceEmbedder::load(SentenceConfig::from_optional_path(
            config.embedding_model_path.as_deref(),
        ))?);

        let classifier = load_classifier(NliConfig {
            model_dir: config.nli_model_path.clone(),
            ..Default::default()
        })?;

        let corpus = match &config.corpus_path {
            Some(path) => match load_corpus(path) {
                Ok(corpus) => corpus,
                Err(e @ CorpusError::Parse { .. }) => {
                    warn!(path = %path.display(), error = %e, "Corpus is malformed, starting with an empty evidence index");
                    Corpus::default()
                }
                Err(e) => return Err(e.into()),
            },
            None => {
                info!("No corpus configured, starting with an empty evidence index");
                Corpus::default()
            }
        };
        let rejected = corpus.rejected;

        let index = Arc::new(EvidenceIndex::new(embedder));
        let index_path = config.index_path();
        let mut status = {
            let index = Arc::clone(&index);
            let index_path = index_path.clone();
            tokio::task::spawn_blocking(move || index.load_or_build(&index_path, corpus.records))
                .await??
        };
        if let IndexStatus::Rebuilt { report, .. } = &mut status {
            report.rejected = rejected;
        }
        match &status {
            IndexStatus::Loaded { records } => info!(records, rejected, "Evidence index ready"),
            IndexStatus::Rebuilt { reason, report } => {
                info!(%reason, indexed = report.indexed, skipped = report.skipped(), "Evidence index rebuilt")
            }
        }

        let mut cache = AnalysisCache::new(config.cache_capacity);
        if config.persist_cache {
            cache = cache.with_store(Arc::new(FileCacheStore::open(config.cache_dir())?));
        }

        AnalyzerBuilder::with_index(index)
            .classifier(Arc::from(classifier))
            .aggregation(AggregationConfig::default())
            .evaluation(
                EvaluationConfig::default()
                    .with_concurrency(config.classify_concurrency)
                    .with_budget_ms(config.analysis_timeout_ms),
            )
            .scoring(ScoringConfig::default().with_trust_threshold(config.trust_threshold))
            .cache(cache)
            .top_k(config.top_k)
            .min_similarity(config.min_similarity)
            .index_path(index_path)
            .build()
            .map(|analyzer| Analyzer {
                index_status: Some(status),
                ..analyzer
            })
    }

    pub fn index(&self) -> &Arc<EvidenceIndex> {
        &self.index
    }

    pub fn cache(&self) -> &AnalysisCache {
        &self.cache
    }

    pub fn scorer(&self) -> &CredibilityScorer {
        &self.scorer
    }

    /// How [`open`](Self::open) obtained the index: loaded from disk or rebuilt. `None` for
    /// analyzers assembled with the builder.
    pub fn index_status(&self) -> Option<&IndexStatus> {
        self.index_status.as_ref()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Analyses `claim`, optionally published at `source_url`.
    pub async fn analyze(
        &self,
        claim: &str,
        source_url: Option<&str>,
    ) -> Result<AnalysisResult, AnalysisError> {
        let mut request = AnalysisRequest::new(claim);
        request.source_url = source_url.map(str::to_string);
        self.analyze_request(request).await
    }

    /// Analyses a claim together with caller-supplied evidence.
    #[instrument(
        skip(self, request),
        fields(claim_len = request.claim.len(), supplied = request.evidence.len())
    )]
    pub async fn analyze_request(
        &self,
        request: AnalysisRequest,
    ) -> Result<AnalysisResult, AnalysisError> {
        if self.is_closed() {
            return Err(AnalysisError::Closed);
        }
        let deadline = self
            .evaluator
            .config()
            .budget
            .map(|budget| Instant::now() + budget);

        let claim = normalize_whitespace(&request.claim);
        if claim.is_empty() {
            return Err(AnalysisError::EmptyClaim);
        }
        for (index, evidence) in request.evidence.iter().enumerate() {
            evidence
                .validate()
                .map_err(|source| AnalysisError::InvalidEvidence { index, source })?;
        }
        let source_url = request
            .source_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string);

        let key = analysis_key(&claim, source_url.as_deref(), &request.evidence);
        let mut degraded = Vec::new();

        match self.cache.get(&key).await {
            Ok(CacheLookup::Hit(result)) => {
                info!(%key, verdict = %result.verdict, "Returning cached analysis");
                return Ok(*result);
            }
            Ok(CacheLookup::Miss) => {}
            Err(e) => {
                warn!(error = %e, "Analysis cache read failed, continuing uncached");
                degraded.push(Degradation::CacheUnavailable);
            }
        }

        let retrieval = match deadline {
            Some(deadline) => timeout_at(deadline, self.retrieve(&claim)).await.ok(),
            None => Some(self.retrieve(&claim).await),
        };
        let hits = match retrieval {
            Some(Ok(hits)) => hits,
            Some(Err(e @ AnalysisError::Index(IndexError::Unavailable))) => return Err(e),
            Some(Err(e)) => {
                warn!(error = %e, "Evidence retrieval failed, using supplied evidence only");
                degraded.push(Degradation::RetrievalFailed);
                Vec::new()
            }
            None => {
                warn!("Analysis budget expired during evidence retrieval");
                Vec::new()
            }
        };

        let candidates: Vec<Candidate> = hits
            .into_iter()
            .map(Candidate::Retrieved)
            .chain(request.evidence.into_iter().map(Candidate::Supplied))
            .collect();

        let evaluation = self
            .evaluator
            .evaluate_until(&claim, candidates, deadline)
            .await;
        if evaluation.heuristic_count > 0 {
            degraded.push(Degradation::HeuristicStance);
        }

        let aggregation = if evaluation.budget_expired {
            degraded.push(Degradation::BudgetExpired);
            self.aggregator.aggregate_partial(
                &evaluation.items,
                evaluation.completed(),
                evaluation.attempted,
            )
        } else {
            self.aggregator.aggregate(&evaluation.items)
        };

        let fingerprint = self
            .scorer
            .score(&claim, &evaluation.items, source_url.as_deref());

        let mut result = AnalysisResult {
            analysis_id: Uuid::new_v4(),
            suspicious_phrases: self.scorer.suspicious_phrases(&claim),
            source: source_url.as_deref().map(source_profile),
            claim,
            source_url,
            verdict: aggregation.verdict,
            confidence: aggregation.confidence,
            credibility_level: fingerprint.level(),
            fingerprint,
            evidence: evaluation.items,
            explanation: with_notes(&aggregation.explanation, &degraded),
            cited_sources: aggregation.cited_sources,
            degraded,
            analyzed_at: Utc::now(),
        };

        // A provisional verdict is not worth remembering.
        if !evaluation.budget_expired
            && let Err(e) = self.cache.put(&key, result.clone()).await
        {
            warn!(error = %e, "Analysis cache write failed");
            if !result.degraded.contains(&Degradation::CacheUnavailable) {
                result.degraded.push(Degradation::CacheUnavailable);
                result.explanation = with_notes(&aggregation.explanation, &result.degraded);
            }
        }

        info!(
            verdict = %result.verdict,
            confidence = result.confidence,
            overall = result.fingerprint.overall_credibility,
            evidence = result.evidence.len(),
            degraded = result.degraded.len(),
            "Analysis complete"
        );

        Ok(result)
    }

    /// Retrieval hits at or above `min_similarity`, best first.
    async fn retrieve(&self, claim: &str) -> Result<Vec<ScoredRecord>, AnalysisError> {
        let index = Arc::clone(&self.index);
        let text = claim.to_string();
        let top_k = self.top_k;

        let hits = tokio::task::spawn_blocking(move || index.query(&text, top_k)).await??;
        let retrieved = hits.len();
        let kept: Vec<ScoredRecord> = hits
            .into_iter()
            .filter(|hit| hit.similarity >= self.min_similarity)
            .collect();

        if kept.len() < retrieved {
            debug!(
                retrieved,
                kept = kept.len(),
                min_similarity = self.min_similarity,
                "Dropped weakly related records"
            );
        }
        Ok(kept)
    }

    /// Rebuilds the index from `records` off the request path, persists it when the analyzer
    /// has an index path, and clears the result cache.
    #[instrument(skip(self, records), fields(records = records.len()))]
    pub async fn rebuild_index(
        &self,
        records: Vec<FactCheckRecord>,
    ) -> Result<BuildReport, AnalysisError> {
        if self.is_closed() {
            return Err(AnalysisError::Closed);
        }

        let report = self.index.rebuild_in_background(records).await??;

        // The new snapshot is already live; results computed against the old one go now.
        if let Err(e) = self.cache.clear().await {
            warn!(error = %e, "Failed to clear durable analysis cache after rebuild");
        }

        if let Some(path) = self.index_path.clone() {
            let index = Arc::clone(&self.index);
            tokio::task::spawn_blocking(move || index.persist(&path)).await??;
        }

        info!(indexed = report.indexed, skipped = report.skipped(), "Index rebuilt");
        Ok(report)
    }

    /// Drops every cached result.
    pub async fn clear_cache(&self) -> Result<(), AnalysisError> {
        self.cache.clear().await?;
        info!("Analysis cache cleared");
        Ok(())
    }

    /// Stops accepting work. In-flight analyses finish; later calls fail with
    /// [`AnalysisError::Closed`].
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            self.cache.run_pending_tasks();
            info!("Analyzer closed");
        }
    }
}

fn with_notes(explanation: &str, degraded: &[Degradation]) -> String {
    if degraded.is_empty() {
        return explanation.to_string();
    }
    let notes: Vec<&str> = degraded.iter().map(Degradation::note).collect();
    format!("{explanation} [{}]", notes.join("; "))
}
