//! From candidates to a verdict.
//!
//! [`EvidenceEvaluator`] classifies retrieval hits and supplied evidence into
//! [`EvidenceItem`](crate::model::EvidenceItem)s. [`EvidenceAggregator`] weighs those items:
//!
//! 1. No evidence gives `UNVERIFIED`; evidence with zero total weight gives `AMBIGUOUS`.
//! 2. A support or contradiction ratio above `decisive_ratio` gives `TRUE` or `FALSE`.
//! 3. Ratios within `ambiguity_band` of each other give `AMBIGUOUS`.
//! 4. Otherwise the larger ratio wins at `lean_factor` confidence. An exact tie goes to the
//!    side with more items, or `AMBIGUOUS` when the counts match.

pub mod aggregator;
pub mod config;
pub mod evaluate;


pub use aggregator::{Aggregation, EvidenceAggregator, NO_EVIDENCE_EXPLANATION};
pub use config::{AggregationConfig, EvaluationConfig};
pub use evaluate::{Candidate, Evaluation, EvidenceEvaluator};
