//! Scriptable stance classifier for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::error::StanceError;
use super::{StanceClassifier, StanceJudgement};
use crate::model::Stance;

/// Returns canned judgements keyed on premise substrings.
///
/// Rules are checked in insertion order; failures take precedence over rules. An optional
/// per-call delay (a blocking sleep) simulates slow inference.
pub struct MockStanceClassifier {
    rules: Vec<(String, StanceJudgement)>,
    failures: Vec<String>,
    fallback: StanceJudgement,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl Default for MockStanceClassifier {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            failures: Vec::new(),
            fallback: StanceJudgement::new(Stance::Neutral, 0.5),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }
}

impl MockStanceClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule(mut self, premise_contains: &str, stance: Stance, confidence: f32) -> Self {
        self.rules.push((
            premise_contains.to_string(),
            StanceJudgement::new(stance, confidence),
        ));
        self
    }

    pub fn with_default(mut self, stance: Stance, confidence: f32) -> Self {
        self.fallback = StanceJudgement::new(stance, confidence);
        self
    }

    /// Fails every call whose premise contains `premise_contains`.
    pub fn failing_on(mut self, premise_contains: &str) -> Self {
        self.failures.push(premise_contains.to_string());
        self
    }

    /// Fails every call.
    pub fn always_failing(self) -> Self {
        self.failing_on("")
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `classify` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl StanceClassifier for MockStanceClassifier {
    fn classify(&self, premise: &str, _hypothesis: &str) -> Result<StanceJudgement, StanceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }

        if self.failures.iter().any(|f| premise.contains(f.as_str())) {
            return Err(StanceError::InferenceFailed {
                reason: "mock failure".to_string(),
            });
        }

        Ok(self
            .rules
            .iter()
            .find(|(needle, _)| premise.contains(needle.as_str()))
            .map(|(_, judgement)| *judgement)
            .unwrap_or(self.fallback))
    }

    fn name(&self) -> &str {
        "mock"
    }
}
