use tracing::debug;

use super::config::ScoringConfig;
use super::domain::{SourceProfile, source_profile};
use super::error::ScoringError;
use super::language::LanguageRules;
use super::types::{CredibilityFingerprint, SuspiciousPhrase};
use crate::constants::{MAX_SCORE, NEUTRAL_SCORE};
use crate::model::{EvidenceItem, Stance};

const TRUST_BALANCE_WEIGHT: f32 = 0.8;
const COUNT_BONUS_PER_ITEM: f32 = 5.0;
const COUNT_BONUS_CAP: f32 = 15.0;
const CONFIDENCE_BALANCE_SCALE: f32 = 10.0;
const LANGUAGE_PENALTY_WEIGHT: f32 = 0.2;

/// Computes a [`CredibilityFingerprint`] from a claim, its evidence and an optional source
/// URL. Pure: the same inputs always give the same fingerprint.
#[derive(Debug, Clone)]
pub struct CredibilityScorer {
    config: ScoringConfig,
    language: LanguageRules,
}

impl CredibilityScorer {
    pub fn new(config: ScoringConfig) -> Result<Self, ScoringError> {
        config.validate()?;
        let language = LanguageRules::new(&config)?;
        Ok(Self { config, language })
    }

    pub fn with_defaults() -> Result<Self, ScoringError> {
        Self::new(ScoringConfig::default())
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn score(
        &self,
        claim: &str,
        evidence: &[EvidenceItem],
        source_url: Option<&str>,
    ) -> CredibilityFingerprint {
        let source_trust = self.source_trust(evidence, source_url);
        let language_safety = self.language_safety(claim);

        let trusted = |stance: Stance| {
            evidence
                .iter()
                .filter(|e| e.stance() == stance && e.reliability() > self.config.trust_threshold)
                .count() as u32
        };
        let corroboration_count = trusted(Stance::Support);
        let contradiction_count = trusted(Stance::Contradict);

        let overall_credibility = overall(
            evidence,
            corroboration_count,
            contradiction_count,
            language_safety,
        );

        debug!(
            evidence = evidence.len(),
            overall_credibility,
            source_trust,
            language_safety,
            corroboration_count,
            contradiction_count,
            "Credibility scored"
        );

        CredibilityFingerprint {
            overall_credibility,
            source_trust,
            language_safety,
            corroboration_count,
            contradiction_count,
        }
    }

    /// Mean evidence reliability, blended 50/50 with the URL's domain trust when a URL is
    /// given. Without evidence it is the domain trust, or neutral without either.
    pub fn source_trust(&self, evidence: &[EvidenceItem], source_url: Option<&str>) -> f32 {
        let domain = source_url
            .filter(|u| !u.trim().is_empty())
            .map(|u| source_profile(u).trust);

        let mean = (!evidence.is_empty()).then(|| {
            evidence.iter().map(|e| e.reliability()).sum::<f32>() / evidence.len() as f32
        });

        let trust = match (mean, domain) {
            (Some(mean), Some(domain)) => (mean + domain) / 2.0,
            (Some(mean), None) => mean,
            (None, Some(domain)) => domain,
            (None, None) => NEUTRAL_SCORE,
        };
        trust.clamp(0.0, MAX_SCORE)
    }

    pub fn language_safety(&self, text: &str) -> f32 {
        self.language.safety(text)
    }

    pub fn suspicious_phrases(&self, text: &str) -> Vec<SuspiciousPhrase> {
        self.language.find(text)
    }

    pub fn source_profile(&self, url: &str) -> SourceProfile {
        source_profile(url)
    }
}

/// `50 + 0.8·(trustBalance − 50) + min(15, 5·corroboration) − min(15, 5·contradiction)
///  + confidenceBalance − 0.2·(100 − language_safety)`, clamped to `[0, 100]`.
///
/// `trustBalance = 100·(S + ½)/(S + C + 1)` where `S`, `C` are the reliability × weight mass
/// (÷100) of supporting and contradicting items; `confidenceBalance = 10·(A − B)/(A + B + 1)`
/// over their summed confidences. Both are strictly increasing in supporting evidence and
/// decreasing in contradicting evidence.
fn overall(
    evidence: &[EvidenceItem],
    corroboration: u32,
    contradiction: u32,
    language_safety: f32,
) -> f32 {
    let (mut support_mass, mut contradict_mass) = (0.0f32, 0.0f32);
    let (mut support_conf, mut contradict_conf) = (0.0f32, 0.0f32);

    for item in evidence {
        let mass = item.reliability() * item.weight() / MAX_SCORE;
        match item.stance() {
            Stance::Support => {
                support_mass += mass;
                support_conf += item.confidence();
            }
            Stance::Contradict => {
                contradict_mass += mass;
                contradict_conf += item.confidence();
            }
            Stance::Neutral => {}
        }
    }

    let trust_balance = MAX_SCORE * (support_mass + 0.5) / (support_mass + contradict_mass + 1.0);
    let confidence_balance = CONFIDENCE_BALANCE_SCALE * (support_conf - contradict_conf)
        / (support_conf + contradict_conf + 1.0);
    let corroboration_bonus = (COUNT_BONUS_PER_ITEM * corroboration as f32).min(COUNT_BONUS_CAP);
    let contradiction_penalty = (COUNT_BONUS_PER_ITEM * contradiction as f32).min(COUNT_BONUS_CAP);
    let language_penalty = LANGUAGE_PENALTY_WEIGHT * (MAX_SCORE - language_safety);

    (NEUTRAL_SCORE + TRUST_BALANCE_WEIGHT * (trust_balance - NEUTRAL_SCORE) + corroboration_bonus
        - contradiction_penalty
        + confidence_balance
        - language_penalty)
        .clamp(0.0, MAX_SCORE)
}
