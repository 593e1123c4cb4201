//! Domain types shared by every pipeline stage.
//!
//! - [`Verdict`] is the canonical four-state outcome; legacy labels are mapped at parse time.
//! - [`FactCheckRecord`] is one entry of the retrieval corpus.
//! - [`EvidenceItem`] is a validated piece of evidence bearing on a claim.

pub mod corpus;
pub mod error;
pub mod evidence;
pub mod record;
pub mod verdict;


pub use corpus::{Corpus, load_corpus, parse_corpus};
pub use error::{CorpusError, ModelError};
pub use evidence::{
    EvidenceItem, EvidenceItemBuilder, Stance, StanceOrigin, SuppliedEvidence, VerificationMethod,
};
pub use record::FactCheckRecord;
pub use verdict::Verdict;
