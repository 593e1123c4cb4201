//! Deterministic stance used when no classifier result is available.

use super::StanceJudgement;
use crate::model::{Stance, Verdict};

/// Cap on heuristic confidence, so a fallback never outweighs a confident model.
pub const HEURISTIC_MAX_CONFIDENCE: f32 = 0.8;

/// Confidence given to supplied evidence whose stance could not be determined.
pub const SUPPLIED_FALLBACK_CONFIDENCE: f32 = 0.5;

/// Derives a stance from a retrieved record's verdict.
///
/// `TRUE` supports and `FALSE` contradicts, at `min(0.8, similarity + 0.1)`; every other
/// verdict is neutral at the similarity itself.
pub fn judge_from_verdict(verdict: Verdict, similarity: f32) -> StanceJudgement {
    let similarity = if similarity.is_finite() {
        similarity
    } else {
        0.0
    };
    let decisive = (similarity + 0.1).min(HEURISTIC_MAX_CONFIDENCE).clamp(0.0, 1.0);

    match verdict {
        Verdict::True => StanceJudgement::new(Stance::Support, decisive),
        Verdict::False => StanceJudgement::new(Stance::Contradict, decisive),
        Verdict::Ambiguous | Verdict::Unverified => {
            StanceJudgement::new(Stance::Neutral, similarity.clamp(0.0, 1.0))
        }
    }
}

/// Stance for supplied evidence the classifier could not judge.
pub fn supplied_fallback() -> StanceJudgement {
    StanceJudgement::new(Stance::Neutral, SUPPLIED_FALLBACK_CONFIDENCE)
}
