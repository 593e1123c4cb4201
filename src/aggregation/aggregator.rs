use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::AggregationConfig;
use crate::model::{EvidenceItem, Stance, Verdict};

/// Explanation of an analysis with nothing to judge from.
pub const NO_EVIDENCE_EXPLANATION: &str = "no evidence found";

/// Weighted verdict over a list of evidence items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    pub verdict: Verdict,
    /// In `[0, 1]`.
    pub confidence: f32,
    pub support_weight: f32,
    pub contradict_weight: f32,
    pub neutral_weight: f32,
    pub support_count: usize,
    pub contradict_count: usize,
    pub neutral_count: usize,
    /// Highest-reliability sources behind the verdict.
    pub cited_sources: Vec<String>,
    pub explanation: String,
}

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    support: f32,
    contradict: f32,
    neutral: f32,
    support_count: usize,
    contradict_count: usize,
    neutral_count: usize,
}

impl Tally {
    fn of(evidence: &[EvidenceItem]) -> Self {
        let mut tally = Self::default();
        for item in evidence {
            let weight = item.weight();
            match item.stance() {
                Stance::Support => {
                    tally.support += weight;
                    tally.support_count += 1;
                }
                Stance::Contradict => {
                    tally.contradict += weight;
                    tally.contradict_count += 1;
                }
                Stance::Neutral => {
                    tally.neutral += weight;
                    tally.neutral_count += 1;
                }
            }
        }
        tally
    }

    fn total(&self) -> f32 {
        self.support + self.contradict + self.neutral
    }
}

/// How the verdict was reached; drives the explanation wording.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Decision {
    NoEvidence,
    Weightless,
    Decisive(Stance),
    Balanced,
    Leaning(Stance),
    Deadlocked,
}

/// Turns evidence into a verdict, confidence and explanation.
///
/// Pure: identical ordered input gives identical output.
#[derive(Debug, Clone, Default)]
pub struct EvidenceAggregator {
    config: AggregationConfig,
}

impl EvidenceAggregator {
    pub fn new(config: AggregationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AggregationConfig {
        &self.config
    }

    pub fn aggregate(&self, evidence: &[EvidenceItem]) -> Aggregation {
        let tally = Tally::of(evidence);
        let total = tally.total();

        let (decision, confidence) = if evidence.is_empty() {
            (Decision::NoEvidence, 0.0)
        } else if total <= 0.0 {
            (Decision::Weightless, 0.0)
        } else {
            self.decide(&tally, total)
        };

        let verdict = match decision {
            Decision::NoEvidence => Verdict::Unverified,
            Decision::Decisive(Stance::Support) | Decision::Leaning(Stance::Support) => {
                Verdict::True
            }
            Decision::Decisive(Stance::Contradict) | Decision::Leaning(Stance::Contradict) => {
                Verdict::False
            }
            _ => Verdict::Ambiguous,
        };

        let cited_sources = self.cite(evidence, decision);
        let explanation = explain(decision, &tally, evidence.len(), &cited_sources);

        debug!(
            items = evidence.len(),
            support = tally.support,
            contradict = tally.contradict,
            neutral = tally.neutral,
            %verdict,
            confidence,
            "Evidence aggregated"
        );

        Aggregation {
            verdict,
            confidence: confidence.clamp(0.0, 1.0),
            support_weight: tally.support,
            contradict_weight: tally.contradict,
            neutral_weight: tally.neutral,
            support_count: tally.support_count,
            contradict_count: tally.contradict_count,
            neutral_count: tally.neutral_count,
            cited_sources,
            explanation,
        }
    }

    /// Best-effort result when evaluation stopped after `completed` of `attempted`
    /// candidates: always `AMBIGUOUS`, at reduced confidence.
    pub fn aggregate_partial(
        &self,
        evidence: &[EvidenceItem],
        completed: usize,
        attempted: usize,
    ) -> Aggregation {
        let mut aggregation = self.aggregate(evidence);
        aggregation.verdict = Verdict::Ambiguous;
        aggregation.confidence *= self.config.lean_factor;
        aggregation.explanation = format!(
            "Evaluation stopped after {completed} of {attempted} evidence candidates; the verdict \
             is provisional. {}",
            capitalize(&aggregation.explanation)
        );
        aggregation
    }

    fn decide(&self, tally: &Tally, total: f32) -> (Decision, f32) {
        let support_ratio = tally.support / total;
        let contradict_ratio = tally.contradict / total;
        let lean = self.config.lean_factor;

        if support_ratio > self.config.decisive_ratio {
            return (Decision::Decisive(Stance::Support), support_ratio);
        }
        if contradict_ratio > self.config.decisive_ratio {
            return (Decision::Decisive(Stance::Contradict), contradict_ratio);
        }
        if (support_ratio - contradict_ratio).abs() < self.config.ambiguity_band {
            return (Decision::Balanced, support_ratio.max(contradict_ratio));
        }
        if support_ratio > contradict_ratio {
            return (Decision::Leaning(Stance::Support), support_ratio * lean);
        }
        if contradict_ratio > support_ratio {
            return (Decision::Leaning(Stance::Contradict), contradict_ratio * lean);
        }

        // Exact tie outside the ambiguity band: more items wins.
        match tally.support_count.cmp(&tally.contradict_count) {
            std::cmp::Ordering::Greater => (Decision::Leaning(Stance::Support), support_ratio * lean),
            std::cmp::Ordering::Less => {
                (Decision::Leaning(Stance::Contradict), contradict_ratio * lean)
            }
            std::cmp::Ordering::Equal => (Decision::Deadlocked, support_ratio),
        }
    }

    /// Up to `max_cited_sources` distinct source names by descending reliability, drawn from
    /// the items backing the verdict. Equal reliability keeps input order.
    fn cite(&self, evidence: &[EvidenceItem], decision: Decision) -> Vec<String> {
        let backing = |item: &&EvidenceItem| match decision {
            Decision::Decisive(stance) | Decision::Leaning(stance) => item.stance() == stance,
            _ => item.stance() != Stance::Neutral,
        };

        let mut ranked: Vec<&EvidenceItem> = evidence.iter().filter(backing).collect();
        if ranked.is_empty() {
            ranked = evidence.iter().collect();
        }
        ranked.sort_by(|a, b| b.reliability().total_cmp(&a.reliability()));

        let mut cited: Vec<String> = Vec::with_capacity(self.config.max_cited_sources);
        for item in ranked {
            if cited.len() == self.config.max_cited_sources {
                break;
            }
            if !cited.iter().any(|s| s == item.source()) {
                cited.push(item.source().to_string());
            }
        }
        cited
    }
}

fn explain(decision: Decision, tally: &Tally, items: usize, cited: &[String]) -> String {
    let counts = format!(
        "{} supporting, {} contradicting and {} neutral {}",
        tally.support_count,
        tally.contradict_count,
        tally.neutral_count,
        if items == 1 { "item" } else { "items" }
    );

    let mut text = match decision {
        Decision::NoEvidence => return NO_EVIDENCE_EXPLANATION.to_string(),
        Decision::Weightless => {
            format!("Evidence was found ({counts}) but none of it carried any weight.")
        }
        Decision::Decisive(Stance::Support) => {
            format!("The evidence supports the claim ({counts}).")
        }
        Decision::Decisive(_) => format!("The evidence contradicts the claim ({counts})."),
        Decision::Balanced => format!("The evidence is mixed ({counts})."),
        Decision::Leaning(Stance::Support) => {
            format!("The evidence leans towards supporting the claim ({counts}).")
        }
        Decision::Leaning(_) => {
            format!("The evidence leans towards contradicting the claim ({counts}).")
        }
        Decision::Deadlocked => {
            format!("Supporting and contradicting evidence are evenly matched ({counts}).")
        }
    };

    if !cited.is_empty() {
        text.push_str(&format!(" Sources include {}.", cited.join(", ")));
    }
    text
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
