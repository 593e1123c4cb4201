use crate::constants::{DEFAULT_TRUST_THRESHOLD, MAX_SCORE};

use super::error::ScoringError;

/// Phrases typical of sensational or conspiratorial writing. Matched case-insensitively on
/// word boundaries.
pub const DEFAULT_SUSPICIOUS_PHRASES: &[&str] = &[
    "shocking",
    "unbelievable",
    "incredible",
    "amazing",
    "breaking",
    "urgent",
    "must see",
    "revealed",
    "exposed",
    "secret",
    "hidden",
    "they don't want you to know",
    "mainstream media",
    "cover-up",
    "conspiracy",
    "hoax",
    "fake news",
    "lies",
    "deception",
    "exclusive",
    "insider",
    "leaked",
    "bombshell",
    "doctors hate",
    "big pharma",
    "click here",
    "you won't believe",
    "one weird trick",
    "stunning",
    "explosive",
    "scam",
];

/// Upper-case tokens that are not shouting.
pub const DEFAULT_ACRONYMS: &[&str] = &["USA", "FBI", "CIA", "WHO", "NASA", "CEO"];

/// Tunables of the [`CredibilityScorer`](super::CredibilityScorer).
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    /// Reliability an item must exceed to count as corroboration or contradiction.
    pub trust_threshold: f32,
    pub suspicious_phrases: Vec<String>,
    pub acronyms: Vec<String>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            trust_threshold: DEFAULT_TRUST_THRESHOLD,
            suspicious_phrases: DEFAULT_SUSPICIOUS_PHRASES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            acronyms: DEFAULT_ACRONYMS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ScoringConfig {
    pub fn with_trust_threshold(mut self, threshold: f32) -> Self {
        self.trust_threshold = threshold;
        self
    }

    pub fn with_phrase(mut self, phrase: impl Into<String>) -> Self {
        self.suspicious_phrases.push(phrase.into());
        self
    }

    pub fn with_acronym(mut self, acronym: impl Into<String>) -> Self {
        self.acronyms.push(acronym.into());
        self
    }

    pub fn validate(&self) -> Result<(), ScoringError> {
        if !(0.0..=MAX_SCORE).contains(&self.trust_threshold) {
            return Err(ScoringError::InvalidConfig {
                reason: format!(
                    "trust_threshold must be within [0, {MAX_SCORE}], got {}",
                    self.trust_threshold
                ),
            });
        }
        if self.suspicious_phrases.iter().any(|p| p.trim().is_empty()) {
            return Err(ScoringError::InvalidConfig {
                reason: "suspicious phrases must not be blank".to_string(),
            });
        }
        Ok(())
    }
}
