use std::time::Duration;

use crate::constants::{DEFAULT_ANALYSIS_TIMEOUT_MS, DEFAULT_CLASSIFY_CONCURRENCY};

/// Ratio above which one side decides the verdict.
pub const DEFAULT_DECISIVE_RATIO: f32 = 0.6;

/// Support/contradiction ratios closer than this are ambiguous.
pub const DEFAULT_AMBIGUITY_BAND: f32 = 0.2;

/// Confidence multiplier when the verdict only leans one way.
pub const DEFAULT_LEAN_FACTOR: f32 = 0.75;

/// Source names quoted in an explanation.
pub const DEFAULT_MAX_CITED_SOURCES: usize = 2;

/// Verdict thresholds of the [`EvidenceAggregator`](super::EvidenceAggregator).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregationConfig {
    pub decisive_ratio: f32,
    pub ambiguity_band: f32,
    pub lean_factor: f32,
    pub max_cited_sources: usize,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            decisive_ratio: DEFAULT_DECISIVE_RATIO,
            ambiguity_band: DEFAULT_AMBIGUITY_BAND,
            lean_factor: DEFAULT_LEAN_FACTOR,
            max_cited_sources: DEFAULT_MAX_CITED_SOURCES,
        }
    }
}

impl AggregationConfig {
    pub fn with_decisive_ratio(mut self, ratio: f32) -> Self {
        self.decisive_ratio = ratio;
        self
    }

    pub fn with_ambiguity_band(mut self, band: f32) -> Self {
        self.ambiguity_band = band;
        self
    }

    pub fn with_lean_factor(mut self, factor: f32) -> Self {
        self.lean_factor = factor;
        self
    }

    pub fn with_max_cited_sources(mut self, max: usize) -> Self {
        self.max_cited_sources = max;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        let unit = 0.0..=1.0;
        if !unit.contains(&self.decisive_ratio) || self.decisive_ratio < 0.5 {
            return Err(format!(
                "decisive_ratio must be within [0.5, 1], got {}",
                self.decisive_ratio
            ));
        }
        if !unit.contains(&self.ambiguity_band) {
            return Err(format!(
                "ambiguity_band must be within [0, 1], got {}",
                self.ambiguity_band
            ));
        }
        if !unit.contains(&self.lean_factor) {
            return Err(format!(
                "lean_factor must be within [0, 1], got {}",
                self.lean_factor
            ));
        }
        Ok(())
    }
}

/// Scheduling of the evaluation stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationConfig {
    /// Classification calls in flight at once. `1` is sequential.
    pub concurrency: usize,
    /// Wall-clock budget for one analysis, counted from the `analyze` call so retrieval is
    /// covered too. `None` waits for every candidate.
    pub budget: Option<Duration>,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CLASSIFY_CONCURRENCY,
            budget: Some(Duration::from_millis(DEFAULT_ANALYSIS_TIMEOUT_MS)),
        }
    }
}

impl EvaluationConfig {
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Sets the budget in milliseconds; `0` disables it.
    pub fn with_budget_ms(mut self, budget_ms: u64) -> Self {
        self.budget = (budget_ms > 0).then(|| Duration::from_millis(budget_ms));
        self
    }
}
