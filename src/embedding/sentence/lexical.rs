//! Deterministic bag-of-words embeddings.
//!
//! Tokens are hashed into `dim` buckets and the counts L2-normalized, so cosine similarity
//! measures content-word overlap. Good enough for tests and for running without model files.

use crate::embedding::utils::l2_normalize;
use crate::hashing::hash_to_u64;

const STOP_WORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "am", "an", "and", "any", "are", "as", "at", "be",
    "been", "being", "but", "by", "can", "could", "did", "do", "does", "for", "from", "had",
    "has", "have", "he", "her", "his", "how", "i", "if", "in", "into", "is", "it", "its", "just",
    "may", "might", "more", "most", "must", "my", "no", "nor", "not", "of", "on", "only", "or",
    "other", "our", "shall", "she", "should", "so", "some", "such", "than", "that", "the",
    "their", "them", "then", "there", "these", "they", "this", "those", "to", "too", "very",
    "was", "we", "were", "what", "when", "where", "which", "while", "who", "whom", "why", "will",
    "with", "would", "you", "your",
];

/// Lowercased content words with a light plural fold (`vaccines` -> `vaccine`).
pub fn content_tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty() && !STOP_WORDS.contains(w))
        .map(fold_plural)
        .collect()
}

fn fold_plural(word: &str) -> String {
    if word.chars().count() > 3 && word.ends_with('s') && !word.ends_with("ss") {
        word[..word.len() - 1].to_string()
    } else {
        word.to_string()
    }
}

/// Embeds `text` into a unit vector of length `dim` (all zeros when it has no content words).
pub fn embed(text: &str, dim: usize) -> Vec<f32> {
    let mut embedding = vec![0.0f32; dim];
    if dim == 0 {
        return embedding;
    }
    for token in content_tokens(text) {
        let bucket = (hash_to_u64(token.as_bytes()) % dim as u64) as usize;
        embedding[bucket] += 1.0;
    }
    l2_normalize(&mut embedding);
    embedding
}
