//! Credibility fingerprinting.
//!
//! [`CredibilityScorer`] turns a claim, its evidence and an optional source URL into a
//! bounded [`CredibilityFingerprint`]. The pieces:
//!
//! - `source_trust`: mean evidence reliability, blended with the URL's entry in the
//!   [`domain`] table.
//! - `corroboration_count` / `contradiction_count`: trusted supporting / contradicting items.
//! - `language_safety`: deductions for sensational wording, repeated `!` and all-caps tokens.
//! - `overall_credibility`: documented on the scorer; monotone in the evidence.

pub mod config;
pub mod domain;
pub mod error;
pub mod language;
pub mod scorer;
pub mod types;


pub use config::{DEFAULT_ACRONYMS, DEFAULT_SUSPICIOUS_PHRASES, ScoringConfig};
pub use domain::{SourceProfile, domain_trust, source_profile};
pub use error::ScoringError;
pub use scorer::CredibilityScorer;
pub use types::{
    CredibilityFingerprint, CredibilityLevel, SourceCategory, SuspicionReason, SuspiciousPhrase,
};
