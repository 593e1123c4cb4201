//! Sentence embedder (BERT mean pooling + tokenizer).
//!
//! Use [`SentenceConfig::stub`] for tests and corpora without model files.

/// Sentence embedder configuration.
pub mod config;
/// Lexical stub embeddings.
pub mod lexical;

#[cfg(test)]
mod tests;

pub use config::{SENTENCE_EMBEDDING_DIM, SENTENCE_MAX_SEQ_LEN, SentenceConfig};

use std::sync::Arc;

use candle_core::Device;
use tracing::{debug, info, warn};

use crate::embedding::EmbeddingProvider;
use crate::embedding::bert::{BertEncoder, EncodedInput};
use crate::embedding::device::select_device;
use crate::embedding::error::EmbeddingError;
use crate::embedding::utils::{check_model_dir, l2_normalize, load_tokenizer};

enum EmbedderBackend {
    Model {
        encoder: BertEncoder,
        tokenizer: Arc<tokenizers::Tokenizer>,
        device: Device,
    },
    Stub,
}

/// Text embedder for the evidence index (supports stub mode).
pub struct SentenceEmbedder {
    backend: EmbedderBackend,
    config: SentenceConfig,
    provider_id: String,
}

impl std::fmt::Debug for SentenceEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentenceEmbedder")
            .field(
                "backend",
                &match &self.backend {
                    EmbedderBackend::Model { device, .. } => format!("Model({:?})", device),
                    EmbedderBackend::Stub => "Stub".to_string(),
                },
            )
            .field("provider_id", &self.provider_id)
            .field("embedding_dim", &self.config.embedding_dim)
            .finish()
    }
}

impl SentenceEmbedder {
    /// Loads the embedder from a config (stub mode is supported).
    pub fn load(config: SentenceConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;

        if config.testing_stub {
            warn!(
                embedding_dim = config.embedding_dim,
                "Sentence embedder running in STUB mode (lexical hashing)"
            );
            let provider_id = format!("lexical-stub/{}", config.embedding_dim);
            return Ok(Self {
                backend: EmbedderBackend::Stub,
                config,
                provider_id,
            });
        }

        check_model_dir(&config.model_dir)?;
        let device = select_device()?;
        debug!(?device, "Selected compute device for sentence embedder");

        let encoder = BertEncoder::load(&config.model_dir, &device).map_err(|e| {
            EmbeddingError::ModelLoadFailed {
                reason: format!("Failed to load BERT encoder: {}", e),
            }
        })?;

        if encoder.hidden_size() != config.embedding_dim {
            return Err(EmbeddingError::DimensionMismatch {
                expected: config.embedding_dim,
                actual: encoder.hidden_size(),
            });
        }

        let tokenizer = load_tokenizer(&config.model_dir, config.max_seq_len)?;

        let model_name = config
            .model_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "bert".to_string());
        let provider_id = format!("bert-mean/{}/{}", model_name, config.embedding_dim);

        info!(
            model_dir = %config.model_dir.display(),
            embedding_dim = config.embedding_dim,
            max_seq_len = config.max_seq_len,
            "Sentence embedding model loaded"
        );

        Ok(Self {
            backend: EmbedderBackend::Model {
                encoder,
                tokenizer: Arc::new(tokenizer),
                device,
            },
            config,
            provider_id,
        })
    }

    /// Shorthand for `load(SentenceConfig::stub())`.
    pub fn stub() -> Result<Self, EmbeddingError> {
        Self::load(SentenceConfig::stub())
    }

    fn embed_with_model(
        &self,
        text: &str,
        encoder: &BertEncoder,
        tokenizer: &tokenizers::Tokenizer,
        device: &Device,
    ) -> Result<Vec<f32>, EmbeddingError> {
        let encoding =
            tokenizer
                .encode(text, true)
                .map_err(|e| EmbeddingError::TokenizationFailed {
                    reason: e.to_string(),
                })?;

        debug!(
            text_len = text.len(),
            token_count = encoding.get_ids().len(),
            "Generating sentence embedding"
        );

        let input = EncodedInput::from_encoding(&encoding, device)?;
        let mut embedding = encoder.embed(&input)?;
        l2_normalize(&mut embedding);
        Ok(embedding)
    }

    /// Returns `true` if running in stub mode.
    pub fn is_stub(&self) -> bool {
        matches!(self.backend, EmbedderBackend::Stub)
    }

    /// Returns the embedder configuration.
    pub fn config(&self) -> &SentenceConfig {
        &self.config
    }
}

impl EmbeddingProvider for SentenceEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        match &self.backend {
            EmbedderBackend::Model {
                encoder,
                tokenizer,
                device,
            } => self.embed_with_model(text, encoder, tokenizer, device),
            EmbedderBackend::Stub => Ok(lexical::embed(text, self.config.embedding_dim)),
        }
    }

    fn dimension(&self) -> usize {
        self.config.embedding_dim
    }

    fn provider_id(&self) -> &str {
        &self.provider_id
    }
}
