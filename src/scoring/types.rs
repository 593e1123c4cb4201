use serde::{Deserialize, Serialize};

/// Structured credibility scores for one claim.
///
/// Every score is in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CredibilityFingerprint {
    pub overall_credibility: f32,
    pub source_trust: f32,
    pub language_safety: f32,
    /// Supporting items above the trust threshold.
    pub corroboration_count: u32,
    /// Contradicting items above the trust threshold.
    pub contradiction_count: u32,
}

impl CredibilityFingerprint {
    pub fn level(&self) -> CredibilityLevel {
        CredibilityLevel::from_score(self.overall_credibility)
    }
}

/// Coarse bucket of an overall credibility score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredibilityLevel {
    High,
    Medium,
    Low,
}

impl CredibilityLevel {
    /// `High` from 80, `Medium` from 50, `Low` below.
    pub fn from_score(score: f32) -> Self {
        if score >= 80.0 {
            CredibilityLevel::High
        } else if score >= 50.0 {
            CredibilityLevel::Medium
        } else {
            CredibilityLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CredibilityLevel::High => "high",
            CredibilityLevel::Medium => "medium",
            CredibilityLevel::Low => "low",
        }
    }
}

impl std::fmt::Display for CredibilityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of publisher behind a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceCategory {
    Government,
    ScientificJournal,
    Organization,
    Academic,
    Commercial,
}

/// Why a span of text lowered the language-safety score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuspicionReason {
    SensationalPhrase,
    RepeatedExclamation,
    AllCaps,
}

impl SuspicionReason {
    /// Language-safety points deducted per occurrence.
    pub fn penalty(&self) -> f32 {
        match self {
            SuspicionReason::SensationalPhrase => 15.0,
            SuspicionReason::RepeatedExclamation => 10.0,
            SuspicionReason::AllCaps => 5.0,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            SuspicionReason::SensationalPhrase => "sensational or conspiratorial wording",
            SuspicionReason::RepeatedExclamation => "repeated exclamation marks",
            SuspicionReason::AllCaps => "all-caps shouting",
        }
    }
}

impl std::fmt::Display for SuspicionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.describe())
    }
}

/// One deduction, located by byte offsets into the analysed text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuspiciousPhrase {
    pub start: usize,
    pub end: usize,
    /// The matched text as it appears in the input.
    pub phrase: String,
    pub reason: SuspicionReason,
}
