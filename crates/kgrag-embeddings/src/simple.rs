//! Feature-hashing embedder (no model, no network).
//!
//! Words are hashed into a fixed-dimension space with several seeded hash
//! functions and random signs. Texts sharing words land close together,
//! which is enough for local runs and tests without an embedding service.

use crate::normalize::normalize_l2;
use crate::{Embedder, EmbeddingError, EmbeddingResult};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Deterministic hash-based embedder.
///
/// # Example
///
/// ```rust
/// use kgrag_embeddings::{Embedder, SimpleEmbedder};
///
/// let embedder = SimpleEmbedder::new(128);
/// let vec = embedder.embed("capital of Germany").unwrap();
/// assert_eq!(vec.len(), 128);
/// ```
pub struct SimpleEmbedder {
    dimension: usize,
    num_hashes: usize,
}

impl SimpleEmbedder {
    /// Create a new simple embedder with specified dimension.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
            num_hashes: 4,
        }
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|s| s.len() > 1)
            .map(|s| s.to_string())
            .collect()
    }

    fn hash_with_seed(&self, word: &str, seed: u64) -> usize {
        let mut hasher = DefaultHasher::new();
        seed.hash(&mut hasher);
        word.hash(&mut hasher);
        (hasher.finish() as usize) % self.dimension
    }

    fn sign_hash(&self, word: &str, seed: u64) -> f32 {
        let mut hasher = DefaultHasher::new();
        (seed + 1000).hash(&mut hasher);
        word.hash(&mut hasher);
        if hasher.finish() % 2 == 0 {
            1.0
        } else {
            -1.0
        }
    }
}

impl Default for SimpleEmbedder {
    fn default() -> Self {
        Self::new(384)
    }
}

impl Embedder for SimpleEmbedder {
    fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::InvalidInput("Empty text".to_string()));
        }

        let mut vector = vec![0.0f32; self.dimension];
        for token in self.tokenize(text) {
            for seed in 0..self.num_hashes as u64 {
                let idx = self.hash_with_seed(&token, seed);
                vector[idx] += self.sign_hash(&token, seed);
            }
        }

        normalize_l2(&mut vector);
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        "simple-hash"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn distance(a: &[f32], b: &[f32]) -> f32 {
        a.iter()
            .zip(b)
            .map(|(x, y)| (x - y).powi(2))
            .sum::<f32>()
            .sqrt()
    }

    #[test]
    fn same_text_same_vector() {
        let embedder = SimpleEmbedder::new(128);
        let v1 = embedder.embed("hello world").unwrap();
        let v2 = embedder.embed("hello world").unwrap();
        assert_eq!(v1.len(), 128);
        assert_eq!(v1, v2);
    }

    #[test]
    fn shared_words_are_closer() {
        let embedder = SimpleEmbedder::new(256);
        let query = embedder.embed("capital of Germany").unwrap();
        let berlin = embedder.embed("Berlin is the capital of Germany").unwrap();
        let quantum = embedder.embed("quantum computing algorithms").unwrap();

        assert!(distance(&query, &berlin) < distance(&query, &quantum));
    }

    #[test]
    fn empty_text_is_rejected() {
        let embedder = SimpleEmbedder::new(16);
        assert!(matches!(
            embedder.embed("   "),
            Err(EmbeddingError::InvalidInput(_))
        ));
    }

    #[test]
    fn punctuation_only_text_is_zero_vector() {
        let embedder = SimpleEmbedder::new(16);
        let v = embedder.embed("?!").unwrap();
        assert!(v.iter().all(|x| *x == 0.0));
    }
}
