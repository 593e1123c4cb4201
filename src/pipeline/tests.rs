use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use super::*;
use crate::aggregation::EvaluationConfig;
use crate::cache::{AnalysisCache, FailingCacheStore};
use crate::embedding::{EmbeddingError, EmbeddingProvider, SentenceEmbedder};
use crate::index::IndexError;
use crate::model::{FactCheckRecord, Stance, StanceOrigin, SuppliedEvidence, Verdict};
use crate::stance::MockStanceClassifier;

fn embedder() -> Arc<dyn EmbeddingProvider> {
    Arc::new(SentenceEmbedder::stub().unwrap())
}

/// Stub embedder that blocks for `delay` once armed, so index builds stay fast.
struct SlowEmbedder {
    inner: SentenceEmbedder,
    delay: Duration,
    armed: AtomicBool,
}

impl SlowEmbedder {
    fn new(delay: Duration) -> Self {
        Self {
            inner: SentenceEmbedder::stub().unwrap(),
            delay,
            armed: AtomicBool::new(false),
        }
    }

    fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }
}

impl EmbeddingProvider for SlowEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if self.armed.load(Ordering::SeqCst) {
            std::thread::sleep(self.delay);
        }
        self.inner.embed(text)
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    fn provider_id(&self) -> &str {
        self.inner.provider_id()
    }
}

fn analyzer_with(records: Vec<FactCheckRecord>) -> Analyzer {
    let analyzer = Analyzer::builder(embedder()).build().unwrap();
    analyzer.index().build(records).unwrap();
    analyzer
}

fn vaccine_corpus() -> Vec<FactCheckRecord> {
    vec![FactCheckRecord::new(1, "Vaccines are safe and effective", Verdict::True)]
}

#[tokio::test]
async fn test_retrieved_true_record_supports_claim() {
    let analyzer = analyzer_with(vaccine_corpus());
    let result = analyzer.analyze("Are vaccines safe?", None).await.unwrap();

    assert_eq!(result.verdict, Verdict::True);
    assert_eq!(result.evidence.len(), 1);

    let item = &result.evidence[0];
    let similarity = item.similarity().unwrap();
    assert!(similarity > 0.7, "similarity {similarity}");
    assert_eq!(item.stance(), Stance::Support);
    assert_eq!(item.stance_origin(), StanceOrigin::Heuristic);
    assert!((item.confidence() - (similarity + 0.1).min(0.8)).abs() < 1e-6);

    assert_eq!(result.degraded, vec![Degradation::HeuristicStance]);
    assert!(result
        .explanation
        .contains("evidence classification unavailable; heuristic used"));
}

#[tokio::test]
async fn test_no_evidence_gives_neutral_fingerprint() {
    let analyzer = analyzer_with(Vec::new());
    let result = analyzer
        .analyze("The Eiffel Tower is in Paris", None)
        .await
        .unwrap();

    assert_eq!(result.verdict, Verdict::Unverified);
    assert_eq!(result.explanation, "no evidence found");
    assert_eq!(result.fingerprint.overall_credibility, 50.0);
    assert_eq!(result.fingerprint.source_trust, 50.0);
    assert_eq!(result.fingerprint.corroboration_count, 0);
    assert_eq!(result.fingerprint.contradiction_count, 0);
    assert_eq!(result.fingerprint.language_safety, 100.0);
    assert!(!result.is_degraded());
}

#[tokio::test]
async fn test_unrelated_records_do_not_vote() {
    let analyzer = analyzer_with(vec![FactCheckRecord::new(
        1,
        "The moon landing was staged",
        Verdict::False,
    )]);
    let result = analyzer.analyze("Are vaccines safe?", None).await.unwrap();

    assert!(result.evidence.is_empty());
    assert_eq!(result.verdict, Verdict::Unverified);
}

#[tokio::test]
async fn test_balanced_supplied_evidence_is_ambiguous() {
    let analyzer = analyzer_with(Vec::new());
    let request = AnalysisRequest::new("Coffee is good for your heart")
        .with_evidence(
            SuppliedEvidence::new("Cohort study shows benefit", "Journal A")
                .declared(Stance::Support, 0.9)
                .with_reliability(90.0),
        )
        .with_evidence(
            SuppliedEvidence::new("Trial shows no benefit", "Journal B")
                .declared(Stance::Contradict, 0.85)
                .with_reliability(85.0),
        );

    let result = analyzer.analyze_request(request).await.unwrap();

    assert_eq!(result.verdict, Verdict::Ambiguous);
    assert_eq!(result.fingerprint.corroboration_count, 1);
    assert_eq!(result.fingerprint.contradiction_count, 1);
    assert!(!result.is_degraded());
}

#[tokio::test]
async fn test_sensational_claim_scores_low_language_safety() {
    let analyzer = analyzer_with(Vec::new());
    let result = analyzer
        .analyze("SHOCKING!! THEY DON'T WANT YOU TO KNOW THIS SECRET CURE!!", None)
        .await
        .unwrap();

    assert!(result.fingerprint.language_safety < 50.0);
    assert!(!result.suspicious_phrases.is_empty());
}

#[tokio::test]
async fn test_source_url_is_profiled() {
    let analyzer = analyzer_with(Vec::new());
    let result = analyzer
        .analyze("Measles cases rose last year", Some("https://www.cdc.gov/measles"))
        .await
        .unwrap();

    let source = result.source.expect("profile");
    assert_eq!(source.domain.as_deref(), Some("cdc.gov"));
    assert_eq!(result.fingerprint.source_trust, 95.0);
    assert_eq!(result.source_url.as_deref(), Some("https://www.cdc.gov/measles"));
}

#[tokio::test]
async fn test_repeat_analysis_hits_cache() {
    let analyzer = analyzer_with(vaccine_corpus());

    let first = analyzer.analyze("Are vaccines safe?", None).await.unwrap();
    let second = analyzer
        .analyze("  Are   vaccines safe?\n", None)
        .await
        .unwrap();

    assert_eq!(first, second);
    analyzer.cache().run_pending_tasks();
    assert_eq!(analyzer.cache().len(), 1);
}

#[tokio::test]
async fn test_cache_failure_degrades_but_succeeds() {
    let analyzer = Analyzer::builder(embedder())
        .cache(AnalysisCache::new(16).with_store(Arc::new(FailingCacheStore)))
        .build()
        .unwrap();
    analyzer.index().build(vaccine_corpus()).unwrap();

    let result = analyzer.analyze("Are vaccines safe?", None).await.unwrap();

    assert_eq!(result.verdict, Verdict::True);
    assert!(result.degraded.contains(&Degradation::CacheUnavailable));
    assert!(result.explanation.contains("result cache unavailable"));
}

#[tokio::test]
async fn test_model_stances_are_not_flagged() {
    let classifier = MockStanceClassifier::new().with_default(Stance::Support, 0.95);
    let analyzer = Analyzer::builder(embedder())
        .classifier(Arc::new(classifier))
        .build()
        .unwrap();
    analyzer.index().build(vaccine_corpus()).unwrap();

    let result = analyzer.analyze("Are vaccines safe?", None).await.unwrap();

    assert_eq!(result.verdict, Verdict::True);
    assert_eq!(result.evidence[0].stance_origin(), StanceOrigin::Model);
    assert!(!result.is_degraded());
}

#[tokio::test]
async fn test_budget_expiry_is_provisional_and_uncached() {
    let classifier = MockStanceClassifier::new().with_delay(Duration::from_millis(300));
    let analyzer = Analyzer::builder(embedder())
        .classifier(Arc::new(classifier))
        .evaluation(EvaluationConfig::default().with_budget_ms(50))
        .build()
        .unwrap();
    analyzer.index().build(vaccine_corpus()).unwrap();

    let result = analyzer.analyze("Are vaccines safe?", None).await.unwrap();

    assert_eq!(result.verdict, Verdict::Ambiguous);
    assert!(result.degraded.contains(&Degradation::BudgetExpired));
    assert!(result.explanation.contains("analysis budget expired"));
    analyzer.cache().run_pending_tasks();
    assert!(analyzer.cache().is_empty());
}

#[tokio::test]
async fn test_unbuilt_index_is_an_error() {
    let analyzer = Analyzer::builder(embedder()).build().unwrap();
    let err = analyzer.analyze("Are vaccines safe?", None).await.unwrap_err();
    assert!(matches!(err, AnalysisError::Index(IndexError::Unavailable)));
}

#[tokio::test]
async fn test_input_validation() {
    let analyzer = analyzer_with(Vec::new());

    assert!(matches!(
        analyzer.analyze("   ", None).await.unwrap_err(),
        AnalysisError::EmptyClaim
    ));

    let request = AnalysisRequest::new("claim")
        .with_evidence(SuppliedEvidence::new("fine", "src"))
        .with_evidence(SuppliedEvidence::new("bad", "src").with_reliability(101.0));
    assert!(matches!(
        analyzer.analyze_request(request).await.unwrap_err(),
        AnalysisError::InvalidEvidence { index: 1, .. }
    ));
}

#[tokio::test]
async fn test_rebuild_index_clears_cache() {
    let analyzer = analyzer_with(vaccine_corpus());
    let before = analyzer.analyze("Are vaccines safe?", None).await.unwrap();

    let mut records = vaccine_corpus();
    records.push(FactCheckRecord::new(2, "Vaccines cause autism", Verdict::False));
    let report = analyzer.rebuild_index(records).await.unwrap();

    assert_eq!(report.indexed, 2);
    assert!(analyzer.cache().is_empty());

    let after = analyzer.analyze("Are vaccines safe?", None).await.unwrap();
    assert_ne!(before.analysis_id, after.analysis_id);
}

#[tokio::test]
async fn test_closed_analyzer_rejects_work() {
    let analyzer = analyzer_with(Vec::new());
    analyzer.close();
    analyzer.close();

    assert!(analyzer.is_closed());
    assert!(matches!(
        analyzer.analyze("claim", None).await.unwrap_err(),
        AnalysisError::Closed
    ));
    assert!(matches!(
        analyzer.rebuild_index(Vec::new()).await.unwrap_err(),
        AnalysisError::Closed
    ));
}

#[test]
fn test_builder_rejects_bad_settings() {
    assert!(matches!(
        Analyzer::builder(embedder()).min_similarity(1.5).build(),
        Err(AnalysisError::InvalidSettings { .. })
    ));
}

#[tokio::test]
async fn test_budget_covers_slow_retrieval() {
    let embedder = Arc::new(SlowEmbedder::new(Duration::from_millis(300)));
    let analyzer = Analyzer::builder(Arc::clone(&embedder) as Arc<dyn EmbeddingProvider>)
        .evaluation(EvaluationConfig::default().with_budget_ms(50))
        .build()
        .unwrap();
    analyzer.index().build(vaccine_corpus()).unwrap();
    embedder.arm();

    let request = AnalysisRequest::new("Are vaccines safe?").with_evidence(
        SuppliedEvidence::new("Trials show vaccines are safe", "Health Desk")
            .declared(Stance::Support, 0.9)
            .with_reliability(90.0),
    );
    let result = analyzer.analyze_request(request).await.unwrap();

    assert_eq!(result.verdict, Verdict::Ambiguous);
    assert!(result.degraded.contains(&Degradation::BudgetExpired));
    assert!(result.evidence.iter().all(|e| e.similarity().is_none()));
    analyzer.cache().run_pending_tasks();
    assert!(analyzer.cache().is_empty());
}

#[tokio::test]
async fn test_failed_persist_still_clears_cache() {
    let dir = tempfile::tempdir().unwrap();
    let analyzer = Analyzer::builder(embedder())
        .index_path(dir.path())
        .build()
        .unwrap();
    analyzer.index().build(vaccine_corpus()).unwrap();
    let before = analyzer.analyze("Are vaccines safe?", None).await.unwrap();

    let mut records = vaccine_corpus();
    records.push(FactCheckRecord::new(2, "Vaccines cause autism", Verdict::False));
    let err = analyzer.rebuild_index(records).await.unwrap_err();

    assert!(matches!(err, AnalysisError::Index(_)));
    assert_eq!(analyzer.index().len(), 2);
    assert!(analyzer.cache().is_empty());

    let after = analyzer.analyze("Are vaccines safe?", None).await.unwrap();
    assert_ne!(before.analysis_id, after.analysis_id);
}

#[tokio::test]
async fn test_builder_analyzer_has_no_index_status() {
    let analyzer = analyzer_with(vaccine_corpus());
    assert!(analyzer.index_status().is_none());
}
