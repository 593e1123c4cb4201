use std::collections::HashSet;

use regex::Regex;

use super::config::ScoringConfig;
use super::error::ScoringError;
use super::types::{SuspicionReason, SuspiciousPhrase};
use crate::constants::MAX_SCORE;

/// Compiled language-safety patterns.
#[derive(Debug, Clone)]
pub struct LanguageRules {
    phrases: Option<Regex>,
    exclamations: Regex,
    caps: Regex,
    acronyms: HashSet<String>,
}

impl LanguageRules {
    pub fn new(config: &ScoringConfig) -> Result<Self, ScoringError> {
        Ok(Self {
            phrases: phrase_pattern(&config.suspicious_phrases)?,
            exclamations: Regex::new(r"!{2,}")?,
            caps: Regex::new(r"\b[A-Z]{3,}\b")?,
            acronyms: config
                .acronyms
                .iter()
                .map(|a| a.trim().to_ascii_uppercase())
                .collect(),
        })
    }

    /// Every deduction in `text`, ordered by position.
    pub fn find(&self, text: &str) -> Vec<SuspiciousPhrase> {
        let mut found = Vec::new();

        if let Some(phrases) = &self.phrases {
            found.extend(
                phrases
                    .find_iter(text)
                    .map(|m| span(m, SuspicionReason::SensationalPhrase)),
            );
        }
        found.extend(
            self.exclamations
                .find_iter(text)
                .map(|m| span(m, SuspicionReason::RepeatedExclamation)),
        );
        found.extend(
            self.caps
                .find_iter(text)
                .filter(|m| !self.acronyms.contains(m.as_str()))
                .map(|m| span(m, SuspicionReason::AllCaps)),
        );

        found.sort_by_key(|p| (p.start, p.end));
        found
    }

    /// `100` minus the penalty of every deduction, floored at `0`.
    pub fn safety(&self, text: &str) -> f32 {
        let penalty: f32 = self.find(text).iter().map(|p| p.reason.penalty()).sum();
        (MAX_SCORE - penalty).clamp(0.0, MAX_SCORE)
    }
}

fn span(m: regex::Match<'_>, reason: SuspicionReason) -> SuspiciousPhrase {
    SuspiciousPhrase {
        start: m.start(),
        end: m.end(),
        phrase: m.as_str().to_string(),
        reason,
    }
}

/// One case-insensitive alternation, longest phrase first so overlapping phrases match the
/// more specific one. Straight and curly apostrophes are interchangeable.
fn phrase_pattern(phrases: &[String]) -> Result<Option<Regex>, ScoringError> {
    let mut phrases: Vec<&str> = phrases
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect();
    if phrases.is_empty() {
        return Ok(None);
    }
    phrases.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    phrases.dedup();

    let alternation = phrases
        .iter()
        .map(|p| regex::escape(p).replace('\'', "['\u{2019}]"))
        .collect::<Vec<_>>()
        .join("|");

    Ok(Some(Regex::new(&format!(r"(?i)\b(?:{alternation})\b"))?))
}
