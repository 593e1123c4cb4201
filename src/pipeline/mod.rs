//! The public entry point: [`Analyzer::analyze`].
//!
//! Per call: canonicalize the input and check the [`AnalysisCache`](crate::cache::AnalysisCache);
//! on a miss, query the index, evaluate retrieved and supplied evidence, aggregate a verdict,
//! score credibility, then cache and return the [`AnalysisResult`].

pub mod analyzer;
pub mod builder;
pub mod error;
pub mod types;

#[cfg(test)]
mod tests;

pub use analyzer::Analyzer;
pub use builder::AnalyzerBuilder;
pub use error::AnalysisError;
pub use types::{AnalysisRequest, AnalysisResult, Degradation};
