use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::error::ModelError;
use crate::constants::MAX_SCORE;

/// Relationship between a piece of evidence and the claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum Stance {
    Support,
    Contradict,
    Neutral,
}

impl Stance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stance::Support => "SUPPORT",
            Stance::Contradict => "CONTRADICT",
            Stance::Neutral => "NEUTRAL",
        }
    }
}

impl FromStr for Stance {
    type Err = ModelError;

    /// Accepts the canonical labels plus the NLI and legacy spellings
    /// (`ENTAILMENT`, `CONTRADICTION`, `CONTEXT`, `supports`, `debunks`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SUPPORT" | "SUPPORTS" | "SUPPORTING" | "ENTAILMENT" => Ok(Stance::Support),
            "CONTRADICT" | "CONTRADICTS" | "CONTRADICTING" | "CONTRADICTION" | "DEBUNKS" => {
                Ok(Stance::Contradict)
            }
            "NEUTRAL" | "CONTEXT" => Ok(Stance::Neutral),
            _ => Err(ModelError::UnknownStance {
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Stance {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for Stance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the underlying source established its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VerificationMethod {
    /// Published fact-check retrieved from the corpus.
    FactCheck,
    /// Peer-reviewed publication.
    PeerReview,
    /// Official / government statement.
    Official,
    /// News reporting.
    News,
    /// Provided by the caller without further detail.
    #[default]
    Supplied,
}

/// Who decided the stance of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StanceOrigin {
    /// The stance classifier.
    Model,
    /// The deterministic fallback (classifier unavailable or failed).
    Heuristic,
    /// The caller supplied the stance.
    #[default]
    Declared,
}

/// A piece of evidence bearing on a claim.
///
/// Constructed through [`EvidenceItem::builder`]; every numeric field is range-checked, so
/// downstream stages never see an out-of-range confidence or reliability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEvidenceItem")]
pub struct EvidenceItem {
    text: String,
    source: String,
    url: Option<String>,
    stance: Stance,
    confidence: f32,
    similarity: Option<f32>,
    reliability: f32,
    verification_method: VerificationMethod,
    stance_origin: StanceOrigin,
}

impl EvidenceItem {
    pub fn builder(text: impl Into<String>, source: impl Into<String>) -> EvidenceItemBuilder {
        EvidenceItemBuilder {
            text: text.into(),
            source: source.into(),
            ..Default::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn stance(&self) -> Stance {
        self.stance
    }

    /// Classifier confidence in `[0, 1]`.
    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    /// Retrieval cosine similarity in `[-1, 1]`; `None` for supplied evidence.
    pub fn similarity(&self) -> Option<f32> {
        self.similarity
    }

    /// Source reliability in `[0, 100]`.
    pub fn reliability(&self) -> f32 {
        self.reliability
    }

    pub fn verification_method(&self) -> VerificationMethod {
        self.verification_method
    }

    pub fn stance_origin(&self) -> StanceOrigin {
        self.stance_origin
    }

    /// Aggregation weight: `clamp((confidence + similarity) / 2, 0, 1)`, with a missing
    /// similarity counted as 0.
    pub fn weight(&self) -> f32 {
        ((self.confidence + self.similarity.unwrap_or(0.0)) / 2.0).clamp(0.0, 1.0)
    }
}

/// Builder for [`EvidenceItem`]. `stance`, `confidence` and `reliability` are mandatory.
#[derive(Debug, Clone, Default)]
pub struct EvidenceItemBuilder {
    text: String,
    source: String,
    url: Option<String>,
    stance: Option<Stance>,
    confidence: Option<f32>,
    similarity: Option<f32>,
    reliability: Option<f32>,
    verification_method: VerificationMethod,
    stance_origin: StanceOrigin,
}

impl EvidenceItemBuilder {
    pub fn url(mut self, url: Option<impl Into<String>>) -> Self {
        self.url = url.map(Into::into);
        self
    }

    pub fn stance(mut self, stance: Stance) -> Self {
        self.stance = Some(stance);
        self
    }

    pub fn confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn similarity(mut self, similarity: f32) -> Self {
        self.similarity = Some(similarity);
        self
    }

    pub fn reliability(mut self, reliability: f32) -> Self {
        self.reliability = Some(reliability);
        self
    }

    pub fn verification_method(mut self, method: VerificationMethod) -> Self {
        self.verification_method = method;
        self
    }

    pub fn stance_origin(mut self, origin: StanceOrigin) -> Self {
        self.stance_origin = origin;
        self
    }

    pub fn build(self) -> Result<EvidenceItem, ModelError> {
        if self.text.trim().is_empty() {
            return Err(ModelError::EmptyField { field: "text" });
        }

        let stance = self
            .stance
            .ok_or(ModelError::MissingField { field: "stance" })?;
        let confidence = self
            .confidence
            .ok_or(ModelError::MissingField { field: "confidence" })?;
        let reliability = self
            .reliability
            .ok_or(ModelError::MissingField {
                field: "reliability",
            })?;

        check_range("confidence", confidence, 0.0, 1.0)?;
        check_range("reliability", reliability, 0.0, MAX_SCORE)?;
        if let Some(similarity) = self.similarity {
            check_range("similarity", similarity, -1.0, 1.0)?;
        }

        let source = if self.source.trim().is_empty() {
            "unknown source".to_string()
        } else {
            self.source
        };

        Ok(EvidenceItem {
            text: self.text,
            source,
            url: self.url.filter(|u| !u.trim().is_empty()),
            stance,
            confidence,
            similarity: self.similarity,
            reliability,
            verification_method: self.verification_method,
            stance_origin: self.stance_origin,
        })
    }
}

fn check_range(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), ModelError> {
    if !value.is_finite() {
        return Err(ModelError::NonFinite { field });
    }
    if value < min || value > max {
        return Err(ModelError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

#[derive(Deserialize)]
struct RawEvidenceItem {
    text: String,
    source: String,
    #[serde(default)]
    url: Option<String>,
    stance: Stance,
    confidence: f32,
    #[serde(default)]
    similarity: Option<f32>,
    reliability: f32,
    #[serde(default)]
    verification_method: VerificationMethod,
    #[serde(default)]
    stance_origin: StanceOrigin,
}

impl TryFrom<RawEvidenceItem> for EvidenceItem {
    type Error = ModelError;

    fn try_from(raw: RawEvidenceItem) -> Result<Self, Self::Error> {
        let mut builder = EvidenceItem::builder(raw.text, raw.source)
            .url(raw.url)
            .stance(raw.stance)
            .confidence(raw.confidence)
            .reliability(raw.reliability)
            .verification_method(raw.verification_method)
            .stance_origin(raw.stance_origin);
        if let Some(similarity) = raw.similarity {
            builder = builder.similarity(similarity);
        }
        builder.build()
    }
}

/// Evidence handed in by the caller alongside a claim.
///
/// Anything not declared is filled in by the pipeline: a missing stance is classified, a
/// missing reliability is looked up from the URL's domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuppliedEvidence {
    pub text: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub stance: Option<Stance>,
    #[serde(default)]
    pub confidence: Option<f32>,
    #[serde(default)]
    pub reliability: Option<f32>,
    #[serde(default)]
    pub verification_method: Option<VerificationMethod>,
}

impl SuppliedEvidence {
    pub fn new(text: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
            url: None,
            stance: None,
            confidence: None,
            reliability: None,
            verification_method: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn declared(mut self, stance: Stance, confidence: f32) -> Self {
        self.stance = Some(stance);
        self.confidence = Some(confidence);
        self
    }

    pub fn with_reliability(mut self, reliability: f32) -> Self {
        self.reliability = Some(reliability);
        self
    }

    /// Checks the declared fields with the same rules as [`EvidenceItemBuilder::build`].
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.text.trim().is_empty() {
            return Err(ModelError::EmptyField { field: "text" });
        }
        if let Some(confidence) = self.confidence {
            check_range("confidence", confidence, 0.0, 1.0)?;
        }
        if let Some(reliability) = self.reliability {
            check_range("reliability", reliability, 0.0, MAX_SCORE)?;
        }
        Ok(())
    }
}
