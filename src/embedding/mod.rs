//! Embedding + model utilities.
//!
//! - [`sentence`] turns claims into vectors for the evidence index.
//! - [`bert`] holds the candle model wrappers shared with the stance classifier.

/// BERT encoder and sequence classifier wrappers.
pub mod bert;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
/// Sentence embedder (index embeddings).
pub mod sentence;
/// Tokenizer/model loading helpers.
pub mod utils;

pub use error::EmbeddingError;
pub use sentence::{SENTENCE_EMBEDDING_DIM, SENTENCE_MAX_SEQ_LEN, SentenceConfig, SentenceEmbedder};

/// Text to fixed-length vector.
///
/// Implementations must be deterministic and return vectors of exactly [`dimension`] floats.
/// `provider_id` identifies the model; a persisted index built by a different provider is
/// rebuilt on load.
///
/// [`dimension`]: EmbeddingProvider::dimension
pub trait EmbeddingProvider: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    fn dimension(&self) -> usize;

    fn provider_id(&self) -> &str;

    fn embed_batch(&self, texts: &[&str]) -> Vec<Result<Vec<f32>, EmbeddingError>> {
        texts.iter().map(|text| self.embed(text)).collect()
    }
}
