//! Evaluation stage: turns retrieval hits and supplied evidence into [`EvidenceItem`]s.
//!
//! Candidates are classified on the blocking pool, at most `concurrency` at a time, in input
//! order. A classifier error only affects its own candidate, which falls back to the
//! heuristic. When the budget runs out the remaining candidates are dropped and the
//! evaluation reports what completed.

use std::sync::Arc;

use futures_util::StreamExt;
use futures_util::stream;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, instrument, warn};

use super::config::EvaluationConfig;
use crate::constants::UNKNOWN_SOURCE_TRUST;
use crate::index::ScoredRecord;
use crate::model::{
    EvidenceItem, ModelError, StanceOrigin, SuppliedEvidence, VerificationMethod,
};
use crate::scoring::domain_trust;
use crate::stance::{StanceClassifier, StanceJudgement, fallback};

/// Something that may become an evidence item.
#[derive(Debug, Clone)]
pub enum Candidate {
    /// A corpus record returned by the index.
    Retrieved(ScoredRecord),
    /// Evidence handed in by the caller.
    Supplied(SuppliedEvidence),
}

/// Output of [`EvidenceEvaluator::evaluate`].
#[derive(Debug, Clone, Default)]
pub struct Evaluation {
    /// Completed items, in candidate order.
    pub items: Vec<EvidenceItem>,
    /// Items whose stance came from the heuristic because classification failed.
    pub heuristic_count: usize,
    /// Candidates handed in.
    pub attempted: usize,
    /// Candidates dropped because they could not form a valid item.
    pub rejected: usize,
    /// `true` when the budget ran out before every candidate completed.
    pub budget_expired: bool,
}

impl Evaluation {
    pub fn completed(&self) -> usize {
        self.items.len() + self.rejected
    }
}

struct Outcome {
    item: Result<EvidenceItem, ModelError>,
    heuristic: bool,
}

/// Classifies candidates against a claim.
pub struct EvidenceEvaluator {
    classifier: Arc<dyn StanceClassifier>,
    config: EvaluationConfig,
}

impl std::fmt::Debug for EvidenceEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvidenceEvaluator")
            .field("classifier", &self.classifier.name())
            .field("config", &self.config)
            .finish()
    }
}

impl EvidenceEvaluator {
    pub fn new(classifier: Arc<dyn StanceClassifier>, config: EvaluationConfig) -> Self {
        Self { classifier, config }
    }

    pub fn classifier(&self) -> &Arc<dyn StanceClassifier> {
        &self.classifier
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    /// Evaluates `candidates` with the configured budget starting now.
    pub async fn evaluate(&self, claim: &str, candidates: Vec<Candidate>) -> Evaluation {
        let deadline = self.config.budget.map(|budget| Instant::now() + budget);
        self.evaluate_until(claim, candidates, deadline).await
    }

    /// Evaluates `candidates`, giving up at `deadline`. A deadline that has already passed
    /// marks the evaluation expired even when there is nothing to classify.
    #[instrument(skip(self, claim, candidates, deadline), fields(candidates = candidates.len()))]
    pub async fn evaluate_until(
        &self,
        claim: &str,
        candidates: Vec<Candidate>,
        deadline: Option<Instant>,
    ) -> Evaluation {
        let attempted = candidates.len();
        let claim: Arc<str> = Arc::from(claim);

        let mut outcomes = stream::iter(candidates.into_iter().map(|candidate| {
            let classifier = Arc::clone(&self.classifier);
            let claim = Arc::clone(&claim);
            evaluate_one(classifier, claim, candidate)
        }))
        .buffered(self.config.concurrency.max(1));

        let mut evaluation = Evaluation {
            attempted,
            ..Default::default()
        };

        if deadline.is_some_and(|deadline| deadline <= Instant::now()) {
            evaluation.budget_expired = true;
        }

        while !evaluation.budget_expired {
            let next = match deadline {
                Some(deadline) => match timeout_at(deadline, outcomes.next()).await {
                    Ok(next) => next,
                    Err(_) => {
                        evaluation.budget_expired = true;
                        break;
                    }
                },
                None => outcomes.next().await,
            };
            let Some(outcome) = next else { break };

            if outcome.heuristic {
                evaluation.heuristic_count += 1;
            }
            match outcome.item {
                Ok(item) => evaluation.items.push(item),
                Err(e) => {
                    warn!(error = %e, "Dropping evidence candidate");
                    evaluation.rejected += 1;
                }
            }
        }

        if evaluation.budget_expired {
            warn!(
                attempted,
                completed = evaluation.completed(),
                "Analysis budget expired during evidence evaluation"
            );
        } else {
            debug!(
                items = evaluation.items.len(),
                heuristic = evaluation.heuristic_count,
                "Evidence evaluated"
            );
        }

        evaluation
    }
}

async fn evaluate_one(
    classifier: Arc<dyn StanceClassifier>,
    claim: Arc<str>,
    candidate: Candidate,
) -> Outcome {
    match candidate {
        Candidate::Retrieved(hit) => {
            let premise = hit.record.premise().to_string();
            let (judgement, heuristic) = match classify(classifier, premise.clone(), claim).await
            {
                Some(judgement) => (judgement, false),
                None => (
                    fallback::judge_from_verdict(hit.record.verdict, hit.similarity),
                    true,
                ),
            };

            let record = &hit.record;
            let item = EvidenceItem::builder(premise, record.display_source())
                .url(record.source_url.clone())
                .stance(judgement.stance)
                .confidence(judgement.confidence)
                .similarity(hit.similarity)
                .reliability(reliability_of(record.source_url.as_deref()))
                .verification_method(VerificationMethod::FactCheck)
                .stance_origin(origin(heuristic))
                .build();

            Outcome { item, heuristic }
        }
        Candidate::Supplied(supplied) => {
            let (judgement, origin, heuristic) = match supplied.stance {
                Some(stance) => (
                    StanceJudgement::new(
                        stance,
                        supplied
                            .confidence
                            .unwrap_or(fallback::SUPPLIED_FALLBACK_CONFIDENCE),
                    ),
                    StanceOrigin::Declared,
                    false,
                ),
                None => match classify(classifier, supplied.text.clone(), claim).await {
                    Some(judgement) => (judgement, StanceOrigin::Model, false),
                    None => (fallback::supplied_fallback(), StanceOrigin::Heuristic, true),
                },
            };

            let reliability = supplied
                .reliability
                .unwrap_or_else(|| reliability_of(supplied.url.as_deref()));

            let item = EvidenceItem::builder(supplied.text, supplied.source)
                .url(supplied.url)
                .stance(judgement.stance)
                .confidence(judgement.confidence)
                .reliability(reliability)
                .verification_method(supplied.verification_method.unwrap_or_default())
                .stance_origin(origin)
                .build();

            Outcome { item, heuristic }
        }
    }
}

/// Runs the classifier on the blocking pool. `None` means the caller should fall back.
async fn classify(
    classifier: Arc<dyn StanceClassifier>,
    premise: String,
    hypothesis: Arc<str>,
) -> Option<StanceJudgement> {
    if !classifier.is_available() {
        return None;
    }

    let result =
        tokio::task::spawn_blocking(move || classifier.classify(&premise, &hypothesis)).await;

    match result {
        Ok(Ok(judgement)) => Some(judgement),
        Ok(Err(e)) => {
            warn!(error = %e, "Stance classification failed, using heuristic");
            None
        }
        Err(e) => {
            warn!(error = %e, "Stance classification task failed, using heuristic");
            None
        }
    }
}

fn reliability_of(url: Option<&str>) -> f32 {
    url.filter(|u| !u.trim().is_empty())
        .map_or(UNKNOWN_SOURCE_TRUST, domain_trust)
}

fn origin(heuristic: bool) -> StanceOrigin {
    if heuristic {
        StanceOrigin::Heuristic
    } else {
        StanceOrigin::Model
    }
}
