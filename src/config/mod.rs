//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `CREDLENS_*` environment variables.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::constants::{
    DEFAULT_ANALYSIS_TIMEOUT_MS, DEFAULT_CACHE_CAPACITY, DEFAULT_CLASSIFY_CONCURRENCY,
    DEFAULT_MIN_SIMILARITY, DEFAULT_TOP_K, DEFAULT_TRUST_THRESHOLD, MAX_SCORE,
};

/// File name of the persisted evidence index inside `storage_path`.
pub const INDEX_FILE_NAME: &str = "evidence.index";

/// Directory name of the durable analysis cache inside `storage_path`.
pub const CACHE_DIR_NAME: &str = "analysis-cache";

/// Analyzer configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `CREDLENS_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory for the persisted index and durable cache. Default: `./.data`.
    pub storage_path: PathBuf,

    /// JSON corpus of prior fact-checks. Without it the index starts empty.
    pub corpus_path: Option<PathBuf>,

    /// Sentence-embedding model directory (BERT + tokenizer). Without it the lexical stub is used.
    pub embedding_model_path: Option<PathBuf>,

    /// NLI model directory. Without it stance falls back to the heuristic.
    pub nli_model_path: Option<PathBuf>,

    /// Records retrieved per analysis. Default: `5`.
    pub top_k: usize,

    /// Retrieved records below this cosine similarity are ignored. Default: `0.25`.
    pub min_similarity: f32,

    /// Reliability an item must exceed to count as corroboration/contradiction. Default: `70`.
    pub trust_threshold: f32,

    /// Items classified concurrently per analysis. Default: `1`.
    pub classify_concurrency: usize,

    /// Per-analysis evaluation budget in milliseconds; `0` disables it. Default: `30000`.
    pub analysis_timeout_ms: u64,

    /// Max entries in the in-memory result cache. Default: `10_000`.
    pub cache_capacity: u64,

    /// Also keep results on disk under `storage_path`. Default: `false`.
    pub persist_cache: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from("./.data"),
            corpus_path: None,
            embedding_model_path: None,
            nli_model_path: None,
            top_k: DEFAULT_TOP_K,
            min_similarity: DEFAULT_MIN_SIMILARITY,
            trust_threshold: DEFAULT_TRUST_THRESHOLD,
            classify_concurrency: DEFAULT_CLASSIFY_CONCURRENCY,
            analysis_timeout_ms: DEFAULT_ANALYSIS_TIMEOUT_MS,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            persist_cache: false,
        }
    }
}

impl Config {
    const ENV_STORAGE_PATH: &'static str = "CREDLENS_STORAGE_PATH";
    const ENV_CORPUS_PATH: &'static str = "CREDLENS_CORPUS_PATH";
    const ENV_EMBEDDING_MODEL_PATH: &'static str = "CREDLENS_EMBEDDING_MODEL_PATH";
    const ENV_NLI_MODEL_PATH: &'static str = "CREDLENS_NLI_MODEL_PATH";
    const ENV_TOP_K: &'static str = "CREDLENS_TOP_K";
    const ENV_MIN_SIMILARITY: &'static str = "CREDLENS_MIN_SIMILARITY";
    const ENV_TRUST_THRESHOLD: &'static str = "CREDLENS_TRUST_THRESHOLD";
    const ENV_CLASSIFY_CONCURRENCY: &'static str = "CREDLENS_CLASSIFY_CONCURRENCY";
    const ENV_ANALYSIS_TIMEOUT_MS: &'static str = "CREDLENS_ANALYSIS_TIMEOUT_MS";
    const ENV_CACHE_CAPACITY: &'static str = "CREDLENS_CACHE_CAPACITY";
    const ENV_PERSIST_CACHE: &'static str = "CREDLENS_PERSIST_CACHE";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            storage_path: Self::parse_path_from_env(Self::ENV_STORAGE_PATH, defaults.storage_path),
            corpus_path: Self::parse_optional_path_from_env(Self::ENV_CORPUS_PATH),
            embedding_model_path: Self::parse_optional_path_from_env(
                Self::ENV_EMBEDDING_MODEL_PATH,
            ),
            nli_model_path: Self::parse_optional_path_from_env(Self::ENV_NLI_MODEL_PATH),
            top_k: Self::parse_from_env(Self::ENV_TOP_K, defaults.top_k)?,
            min_similarity: Self::parse_from_env(Self::ENV_MIN_SIMILARITY, defaults.min_similarity)?,
            trust_threshold: Self::parse_from_env(
                Self::ENV_TRUST_THRESHOLD,
                defaults.trust_threshold,
            )?,
            classify_concurrency: Self::parse_from_env(
                Self::ENV_CLASSIFY_CONCURRENCY,
                defaults.classify_concurrency,
            )?,
            analysis_timeout_ms: Self::parse_from_env(
                Self::ENV_ANALYSIS_TIMEOUT_MS,
                defaults.analysis_timeout_ms,
            )?,
            cache_capacity: Self::parse_from_env(Self::ENV_CACHE_CAPACITY, defaults.cache_capacity)?,
            persist_cache: Self::parse_bool_from_env(
                Self::ENV_PERSIST_CACHE,
                defaults.persist_cache,
            )?,
        })
    }

    /// Validates paths and numeric ranges (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_path.exists() && !self.storage_path.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.storage_path.clone(),
            });
        }

        if let Some(ref path) = self.corpus_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_file() {
                return Err(ConfigError::NotAFile { path: path.clone() });
            }
        }

        for path in [&self.embedding_model_path, &self.nli_model_path]
            .into_iter()
            .flatten()
        {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        check_range("top_k", self.top_k as f64, 1.0, 1_000.0)?;
        check_range("min_similarity", self.min_similarity as f64, -1.0, 1.0)?;
        check_range("trust_threshold", self.trust_threshold as f64, 0.0, MAX_SCORE as f64)?;
        check_range(
            "classify_concurrency",
            self.classify_concurrency as f64,
            1.0,
            256.0,
        )?;

        Ok(())
    }

    /// Location of the persisted evidence index.
    pub fn index_path(&self) -> PathBuf {
        self.storage_path.join(INDEX_FILE_NAME)
    }

    /// Directory of the durable analysis cache.
    pub fn cache_dir(&self) -> PathBuf {
        self.storage_path.join(CACHE_DIR_NAME)
    }

    fn parse_from_env<T>(var_name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let Ok(value) = env::var(var_name) else {
            return Ok(default);
        };
        match value.trim().parse::<T>() {
            Ok(parsed) => Ok(parsed),
            Err(e) => Err(ConfigError::ParseError {
                name: var_name,
                reason: e.to_string(),
                value,
            }),
        }
    }

    fn parse_bool_from_env(var_name: &'static str, default: bool) -> Result<bool, ConfigError> {
        match env::var(var_name) {
            Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" | "" => Ok(false),
                _ => Err(ConfigError::ParseError {
                    name: var_name,
                    value,
                    reason: "expected a boolean".to_string(),
                }),
            },
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }
}

fn check_range(name: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < min || value > max {
        return Err(ConfigError::OutOfRange {
            name,
            value,
            min,
            max,
        });
    }
    Ok(())
}
