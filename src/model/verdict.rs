use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::error::ModelError;

/// Canonical outcome of an analysis (and of a corpus record).
///
/// Older corpora and upstream services use several synonyms for the same states; they are
/// folded into these four variants by [`FromStr`] (strict) and [`Verdict::from_legacy`]
/// (lenient).
///
/// `Unverified` means there was nothing to judge from; `Ambiguous` means there was
/// evidence but it did not settle the claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum Verdict {
    True,
    False,
    Ambiguous,
    Unverified,
}

impl Verdict {
    /// Returns the canonical label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::True => "TRUE",
            Verdict::False => "FALSE",
            Verdict::Ambiguous => "AMBIGUOUS",
            Verdict::Unverified => "UNVERIFIED",
        }
    }

    /// Parses a label, mapping anything unrecognised to [`Verdict::Ambiguous`].
    pub fn from_legacy(label: &str) -> Self {
        label.parse().unwrap_or(Verdict::Ambiguous)
    }

    /// Returns `true` for `True` and `False`.
    pub fn is_decisive(&self) -> bool {
        matches!(self, Verdict::True | Verdict::False)
    }
}

impl FromStr for Verdict {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace([' ', '-'], "_").as_str() {
            "TRUE" | "LIKELY_TRUE" => Ok(Verdict::True),
            "FALSE" | "LIKELY_FALSE" => Ok(Verdict::False),
            "AMBIGUOUS" | "MIXED" | "UNCERTAIN" => Ok(Verdict::Ambiguous),
            "UNVERIFIED" => Ok(Verdict::Unverified),
            _ => Err(ModelError::UnknownVerdict {
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Verdict {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
