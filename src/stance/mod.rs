//! Stance classification: does a piece of evidence support the claim?
//!
//! [`StanceClassifier`] is the seam. [`NliClassifier`] runs an MNLI-style model,
//! [`UnavailableClassifier`] stands in when no model is configured, and [`fallback`] holds
//! the deterministic heuristic the evaluation stage uses whenever a classifier errors.

pub mod config;
pub mod error;
pub mod fallback;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod nli;


pub use config::{NLI_MAX_SEQ_LEN, NliConfig};
pub use error::StanceError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockStanceClassifier;
pub use nli::NliClassifier;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::model::Stance;

/// A classifier's answer for one (premise, hypothesis) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StanceJudgement {
    pub stance: Stance,
    /// In `[0, 1]`.
    pub confidence: f32,
}

impl StanceJudgement {
    /// Creates a judgement, clamping `confidence` into `[0, 1]` (NaN becomes 0).
    pub fn new(stance: Stance, confidence: f32) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self { stance, confidence }
    }
}

/// `(premise, hypothesis) -> (stance, confidence)`.
///
/// The premise is the evidence text, the hypothesis is the claim. Calls are blocking and
/// may be slow; the evaluation stage runs them on the blocking pool.
pub trait StanceClassifier: Send + Sync {
    fn classify(&self, premise: &str, hypothesis: &str) -> Result<StanceJudgement, StanceError>;

    /// `false` when every call is known to fail, which lets callers skip straight to the
    /// heuristic.
    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str;
}

/// Classifier used when no NLI model is configured. Every call fails.
#[derive(Debug, Clone)]
pub struct UnavailableClassifier {
    reason: String,
}

impl UnavailableClassifier {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Default for UnavailableClassifier {
    fn default() -> Self {
        Self::new("no NLI model configured")
    }
}

impl StanceClassifier for UnavailableClassifier {
    fn classify(&self, _premise: &str, _hypothesis: &str) -> Result<StanceJudgement, StanceError> {
        Err(StanceError::Unavailable {
            reason: self.reason.clone(),
        })
    }

    fn is_available(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "unavailable"
    }
}

/// Loads the NLI model when `config` names one, or returns an [`UnavailableClassifier`].
pub fn load_classifier(config: NliConfig) -> Result<Box<dyn StanceClassifier>, StanceError> {
    if config.model_dir.is_none() {
        info!("No NLI model path configured, stance falls back to heuristic");
        return Ok(Box::new(UnavailableClassifier::default()));
    }
    Ok(Box::new(NliClassifier::load(config)?))
}
