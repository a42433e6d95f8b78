//! Mock embedding provider with deterministic, content-dependent vectors.

use crate::embeddings::provider::{EmbeddingProvider, EmbeddingTask};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use zenith_core::AppResult;

/// Mock provider for testing and offline development.
///
/// Hashes words and character trigrams into vector dimensions, so the output
/// is deterministic and texts sharing vocabulary land near each other. Not
/// semantically meaningful, but good enough to exercise the index. Vectors
/// are unit-normalized to honor the provider contract.
#[derive(Debug)]
pub struct MockProvider {
    dimensions: usize,
}

impl MockProvider {
    /// Create a new mock provider with the given dimensionality.
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dimensions];
        let lower = text.to_lowercase();

        for word in lower.split_whitespace().filter(|w| w.len() > 2) {
            embedding[self.bucket(word)] += 1.0;

            let chars: Vec<char> = word.chars().collect();
            for trigram in chars.windows(3) {
                let key: String = trigram.iter().collect();
                embedding[self.bucket(&key)] += 0.5;
            }
        }

        // Normalize to a unit vector; empty text stays all-zero
        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut embedding {
                *v /= norm;
            }
        }

        embedding
    }

    fn bucket(&self, key: &str) -> usize {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() as usize) % self.dimensions
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for MockProvider {
    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "hash-v1"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(
        &self,
        texts: &[String],
        _task: EmbeddingTask,
    ) -> AppResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }
}
