use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use super::verdict::Verdict;

/// A previously published fact-check, as stored in the retrieval corpus.
///
/// `embedding` is empty in corpus files and filled (L2-normalized) when the index is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactCheckRecord {
    /// Corpus-unique id. Zero means "unassigned"; [`crate::model::parse_corpus`] numbers them.
    #[serde(default)]
    pub id: u64,
    /// The claim that was checked.
    pub claim: String,
    /// Verdict the fact-checker reached. Labels outside the known synonyms read as
    /// [`Verdict::Ambiguous`].
    #[serde(deserialize_with = "lenient_verdict")]
    pub verdict: Verdict,
    /// Fact-checker's explanation.
    #[serde(default)]
    pub explanation: String,
    /// Publisher name (e.g. "Reuters Fact Check").
    #[serde(default)]
    pub source: String,
    /// Link to the published fact-check.
    #[serde(default)]
    pub source_url: Option<String>,
    /// Publication date.
    #[serde(default, alias = "date_published")]
    pub published: Option<NaiveDate>,
    /// Normalized claim embedding.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embedding: Vec<f32>,
}

impl FactCheckRecord {
    pub fn new(id: u64, claim: impl Into<String>, verdict: Verdict) -> Self {
        Self {
            id,
            claim: claim.into(),
            verdict,
            explanation: String::new(),
            source: String::new(),
            source_url: None,
            published: None,
            embedding: Vec::new(),
        }
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>, url: Option<&str>) -> Self {
        self.source = source.into();
        self.source_url = url.map(str::to_string);
        self
    }

    pub fn with_published(mut self, date: NaiveDate) -> Self {
        self.published = Some(date);
        self
    }

    /// Text handed to the stance classifier as the premise.
    ///
    /// The explanation carries the fact-checker's reasoning, so it is preferred; records
    /// without one fall back to the checked claim.
    pub fn premise(&self) -> &str {
        if self.explanation.trim().is_empty() {
            &self.claim
        } else {
            &self.explanation
        }
    }

    /// Display name for citations, falling back to the URL host or "unknown source".
    pub fn display_source(&self) -> String {
        if !self.source.trim().is_empty() {
            return self.source.clone();
        }
        self.source_url
            .as_deref()
            .and_then(|u| url::Url::parse(u).ok())
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| "unknown source".to_string())
    }
}

fn lenient_verdict<'de, D>(deserializer: D) -> Result<Verdict, D::Error>
where
    D: Deserializer<'de>,
{
    let label = String::deserialize(deserializer)?;
    if label.parse::<Verdict>().is_err() {
        warn!(label = %label, "Unrecognised verdict label, reading it as AMBIGUOUS");
    }
    Ok(Verdict::from_legacy(&label))
}
