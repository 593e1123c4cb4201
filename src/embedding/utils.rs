use std::path::{Path, PathBuf};

use tokenizers::{Tokenizer, TruncationParams};

use super::error::EmbeddingError;

/// Resolves `tokenizer.json` from a model directory or an explicit file path.
pub fn tokenizer_path(model_path: &Path) -> PathBuf {
    if model_path
        .file_name()
        .is_some_and(|name| name == std::ffi::OsStr::new("tokenizer.json"))
    {
        model_path.to_path_buf()
    } else {
        model_path.join("tokenizer.json")
    }
}

/// Loads a tokenizer with truncation to `max_len` tokens.
///
/// Pair inputs (premise, hypothesis) are truncated longest-first, so both sides survive.
pub fn load_tokenizer(model_path: &Path, max_len: usize) -> Result<Tokenizer, EmbeddingError> {
    let path = tokenizer_path(model_path);
    if !path.exists() {
        return Err(EmbeddingError::ModelNotFound { path });
    }

    let mut tokenizer =
        Tokenizer::from_file(&path).map_err(|e| EmbeddingError::TokenizationFailed {
            reason: format!("failed to load {}: {e}", path.display()),
        })?;

    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length: max_len,
            ..Default::default()
        }))
        .map_err(|e| EmbeddingError::TokenizationFailed {
            reason: format!("failed to configure truncation: {e}"),
        })?;

    Ok(tokenizer)
}

/// Checks that a model directory carries the files candle needs.
pub fn check_model_dir(model_dir: &Path) -> Result<(), EmbeddingError> {
    if !model_dir.is_dir() {
        return Err(EmbeddingError::ModelNotFound {
            path: model_dir.to_path_buf(),
        });
    }
    for file in ["config.json", "model.safetensors"] {
        if !model_dir.join(file).exists() {
            return Err(EmbeddingError::ModelLoadFailed {
                reason: format!("missing {file} in {}", model_dir.display()),
            });
        }
    }
    Ok(())
}

/// Scales `v` to unit length in place. Zero vectors are left untouched.
pub fn l2_normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenizer_path_resolution() {
        assert_eq!(
            tokenizer_path(Path::new("/models/minilm")),
            PathBuf::from("/models/minilm/tokenizer.json")
        );
        assert_eq!(
            tokenizer_path(Path::new("/models/minilm/tokenizer.json")),
            PathBuf::from("/models/minilm/tokenizer.json")
        );
    }

    #[test]
    fn test_missing_tokenizer() {
        let err = load_tokenizer(Path::new("/nonexistent/model"), 128).unwrap_err();
        assert!(matches!(err, EmbeddingError::ModelNotFound { .. }));
    }

    #[test]
    fn test_check_model_dir_requires_weights() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.json"), "{}").unwrap();

        let err = check_model_dir(dir.path()).unwrap_err();
        assert!(err.to_string().contains("model.safetensors"));
    }

    #[test]
    fn test_l2_normalize() {
        let mut v = vec![3.0, 4.0];
        l2_normalize(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);

        let mut zero = vec![0.0; 4];
        l2_normalize(&mut zero);
        assert!(zero.iter().all(|x| *x == 0.0));
    }
}
