use super::*;
use serial_test::serial;
use std::env;
use std::path::PathBuf;

const ALL_VARS: [&str; 11] = [
    "CREDLENS_STORAGE_PATH",
    "CREDLENS_CORPUS_PATH",
    "CREDLENS_EMBEDDING_MODEL_PATH",
    "CREDLENS_NLI_MODEL_PATH",
    "CREDLENS_TOP_K",
    "CREDLENS_MIN_SIMILARITY",
    "CREDLENS_TRUST_THRESHOLD",
    "CREDLENS_CLASSIFY_CONCURRENCY",
    "CREDLENS_ANALYSIS_TIMEOUT_MS",
    "CREDLENS_CACHE_CAPACITY",
    "CREDLENS_PERSIST_CACHE",
];

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_credlens_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for key in ALL_VARS {
        unsafe { env::remove_var(key) };
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.storage_path, PathBuf::from("./.data"));
    assert!(config.corpus_path.is_none());
    assert!(config.embedding_model_path.is_none());
    assert!(config.nli_model_path.is_none());
    assert_eq!(config.top_k, 5);
    assert_eq!(config.min_similarity, 0.25);
    assert_eq!(config.trust_threshold, 70.0);
    assert_eq!(config.classify_concurrency, 1);
    assert_eq!(config.analysis_timeout_ms, 30_000);
    assert_eq!(config.cache_capacity, 10_000);
    assert!(!config.persist_cache);
}

#[test]
fn test_derived_paths() {
    let config = Config {
        storage_path: PathBuf::from("/var/lib/credlens"),
        ..Default::default()
    };

    assert_eq!(
        config.index_path(),
        PathBuf::from("/var/lib/credlens/evidence.index")
    );
    assert_eq!(
        config.cache_dir(),
        PathBuf::from("/var/lib/credlens/analysis-cache")
    );
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_credlens_env();

    let config = Config::from_env().expect("should parse with defaults");

    assert_eq!(config.top_k, 5);
    assert_eq!(config.analysis_timeout_ms, 30_000);
}

#[test]
#[serial]
fn test_from_env_full() {
    clear_credlens_env();

    with_env_vars(
        &[
            ("CREDLENS_STORAGE_PATH", "/mnt/data"),
            ("CREDLENS_CORPUS_PATH", "/mnt/data/corpus.json"),
            ("CREDLENS_EMBEDDING_MODEL_PATH", "/models/minilm"),
            ("CREDLENS_NLI_MODEL_PATH", "/models/mnli"),
            ("CREDLENS_TOP_K", "8"),
            ("CREDLENS_MIN_SIMILARITY", "0.4"),
            ("CREDLENS_TRUST_THRESHOLD", "65"),
            ("CREDLENS_CLASSIFY_CONCURRENCY", "4"),
            ("CREDLENS_ANALYSIS_TIMEOUT_MS", "0"),
            ("CREDLENS_CACHE_CAPACITY", "500"),
            ("CREDLENS_PERSIST_CACHE", "true"),
        ],
        || {
            let config = Config::from_env().expect("should parse full config");

            assert_eq!(config.storage_path, PathBuf::from("/mnt/data"));
            assert_eq!(
                config.corpus_path,
                Some(PathBuf::from("/mnt/data/corpus.json"))
            );
            assert_eq!(
                config.embedding_model_path,
                Some(PathBuf::from("/models/minilm"))
            );
            assert_eq!(config.nli_model_path, Some(PathBuf::from("/models/mnli")));
            assert_eq!(config.top_k, 8);
            assert_eq!(config.min_similarity, 0.4);
            assert_eq!(config.trust_threshold, 65.0);
            assert_eq!(config.classify_concurrency, 4);
            assert_eq!(config.analysis_timeout_ms, 0);
            assert_eq!(config.cache_capacity, 500);
            assert!(config.persist_cache);
        },
    );
}

#[test]
#[serial]
fn test_from_env_blank_optional_path_is_none() {
    clear_credlens_env();

    with_env_vars(&[("CREDLENS_NLI_MODEL_PATH", "   ")], || {
        let config = Config::from_env().expect("should parse");
        assert!(config.nli_model_path.is_none());
    });
}

#[test]
#[serial]
fn test_from_env_invalid_number() {
    clear_credlens_env();

    with_env_vars(&[("CREDLENS_TOP_K", "many")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ParseError {
                name: "CREDLENS_TOP_K",
                ..
            }
        ));
        assert!(err.to_string().contains("many"));
    });
}

#[test]
#[serial]
fn test_from_env_invalid_bool() {
    clear_credlens_env();

    with_env_vars(&[("CREDLENS_PERSIST_CACHE", "sometimes")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    });
}

#[test]
fn test_validate_success_with_defaults() {
    assert!(Config::default().validate().is_ok());
}

#[test]
fn test_validate_storage_path_is_file() {
    let config = Config {
        storage_path: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml"),
        ..Default::default()
    };

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::NotADirectory { .. }));
}

#[test]
fn test_validate_nonexistent_corpus() {
    let config = Config {
        corpus_path: Some(PathBuf::from("/nonexistent/corpus.json")),
        ..Default::default()
    };

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::PathNotFound { .. }));
}

#[test]
fn test_validate_corpus_is_directory() {
    let config = Config {
        corpus_path: Some(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src")),
        ..Default::default()
    };

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::NotAFile { .. }));
}

#[test]
fn test_validate_model_path_is_file() {
    let config = Config {
        nli_model_path: Some(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml")),
        ..Default::default()
    };

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::NotADirectory { .. }));
}

#[test]
fn test_validate_rejects_out_of_range_numbers() {
    let config = Config {
        top_k: 0,
        ..Default::default()
    };
    assert!(matches!(
        config.validate().unwrap_err(),
        ConfigError::OutOfRange { name: "top_k", .. }
    ));

    let config = Config {
        min_similarity: 1.5,
        ..Default::default()
    };
    assert!(matches!(
        config.validate().unwrap_err(),
        ConfigError::OutOfRange {
            name: "min_similarity",
            ..
        }
    ));

    let config = Config {
        classify_concurrency: 0,
        ..Default::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_success_with_valid_paths() {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));

    let config = Config {
        storage_path: manifest_dir.join("src"),
        corpus_path: Some(manifest_dir.join("Cargo.toml")),
        embedding_model_path: Some(manifest_dir.join("src")),
        nli_model_path: Some(manifest_dir.join("tests")),
        ..Default::default()
    };

    assert!(config.validate().is_ok());
}
