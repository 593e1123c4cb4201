use std::path::PathBuf;
use thiserror::Error;

/// Validation failures for domain values.
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("{field} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },

    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("{field} cannot be empty")]
    EmptyField { field: &'static str },

    #[error("unknown verdict label: '{value}'")]
    UnknownVerdict { value: String },

    #[error("unknown stance label: '{value}'")]
    UnknownStance { value: String },

    #[error("invalid date '{value}', expected YYYY-MM-DD")]
    InvalidDate { value: String },
}

/// Failures while reading a fact-check corpus.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read corpus at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed corpus: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
    },
}
