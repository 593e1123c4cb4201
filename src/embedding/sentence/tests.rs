use super::*;
use std::path::PathBuf;

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

mod config_tests {
    use super::*;

    #[test]
    fn test_sentence_config_default() {
        let config = SentenceConfig::default();
        assert_eq!(config.embedding_dim, SENTENCE_EMBEDDING_DIM);
        assert_eq!(config.max_seq_len, SENTENCE_MAX_SEQ_LEN);
        assert!(!config.testing_stub);
        assert!(config.model_dir.as_os_str().is_empty());
    }

    #[test]
    fn test_sentence_config_from_optional_path() {
        let config = SentenceConfig::from_optional_path(Some(std::path::Path::new("/m/minilm")));
        assert_eq!(config.model_dir, PathBuf::from("/m/minilm"));
        assert!(!config.testing_stub);

        assert!(SentenceConfig::from_optional_path(None).testing_stub);
    }

    #[test]
    fn test_validation_empty_path_no_stub() {
        let err = SentenceConfig::default().validate().unwrap_err();
        assert!(matches!(err, EmbeddingError::InvalidConfig { .. }));
        assert!(err.to_string().contains("model_dir is required"));
    }

    #[test]
    fn test_validation_missing_dir() {
        let err = SentenceConfig::new("/nonexistent/minilm")
            .validate()
            .unwrap_err();
        assert!(matches!(err, EmbeddingError::ModelNotFound { .. }));
    }

    #[test]
    fn test_validation_zero_dimension() {
        let err = SentenceConfig::stub()
            .with_embedding_dim(0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, EmbeddingError::InvalidConfig { .. }));
    }
}

mod stub_tests {
    use super::*;

    #[test]
    fn test_stub_identity() {
        let embedder = SentenceEmbedder::stub().unwrap();
        assert!(embedder.is_stub());
        assert_eq!(embedder.dimension(), SENTENCE_EMBEDDING_DIM);
        assert_eq!(embedder.provider_id(), "lexical-stub/384");
    }

    #[test]
    fn test_stub_is_deterministic_and_normalized() {
        let embedder = SentenceEmbedder::stub().unwrap();
        let a = embedder.embed("Vaccines are safe and effective").unwrap();
        let b = embedder.embed("Vaccines are safe and effective").unwrap();

        assert_eq!(a, b);
        assert_eq!(a.len(), SENTENCE_EMBEDDING_DIM);
        let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_stub_similarity_tracks_word_overlap() {
        let embedder = SentenceEmbedder::stub().unwrap();
        let claim = embedder.embed("Are vaccines safe?").unwrap();
        let related = embedder.embed("Vaccines are safe and effective").unwrap();
        let unrelated = embedder.embed("The moon landing was staged").unwrap();

        assert!(cosine(&claim, &related) > 0.7);
        assert!(cosine(&claim, &related) > cosine(&claim, &unrelated));
    }

    #[test]
    fn test_stub_stopword_only_text_is_zero() {
        let embedder = SentenceEmbedder::stub().unwrap();
        let v = embedder.embed("is it the").unwrap();
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_stub_custom_dimension() {
        let embedder = SentenceEmbedder::load(SentenceConfig::stub().with_embedding_dim(16)).unwrap();
        assert_eq!(embedder.embed("climate").unwrap().len(), 16);
        assert_eq!(embedder.provider_id(), "lexical-stub/16");
    }

    #[test]
    fn test_embed_batch_preserves_order() {
        let embedder = SentenceEmbedder::stub().unwrap();
        let batch = embedder.embed_batch(&["alpha", "beta"]);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].as_ref().unwrap(), &embedder.embed("alpha").unwrap());
        assert_eq!(batch[1].as_ref().unwrap(), &embedder.embed("beta").unwrap());
    }

    #[test]
    fn test_debug_output() {
        let embedder = SentenceEmbedder::stub().unwrap();
        let debug_str = format!("{:?}", embedder);
        assert!(debug_str.contains("SentenceEmbedder"));
        assert!(debug_str.contains("Stub"));
    }
}

mod lexical_tests {
    use super::lexical::content_tokens;

    #[test]
    fn test_content_tokens() {
        assert_eq!(
            content_tokens("Are vaccines SAFE?"),
            vec!["vaccine".to_string(), "safe".to_string()]
        );
    }

    #[test]
    fn test_plural_fold_keeps_short_and_double_s() {
        assert_eq!(content_tokens("gas"), vec!["gas".to_string()]);
        assert_eq!(content_tokens("glass"), vec!["glass".to_string()]);
    }
}

mod model_tests {
    use super::*;

    #[test]
    fn test_load_missing_weights_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = SentenceEmbedder::load(SentenceConfig::new(dir.path())).unwrap_err();
        assert!(matches!(err, EmbeddingError::ModelLoadFailed { .. }));
    }
}
