//! Deterministic mock backends for tests and offline demos.
//!
//! [`MockEmbeddingProvider`] derives a stable, L2-normalized vector from a
//! hash of the input text, so equal texts always embed identically and the
//! whole pipeline runs with zero API keys. [`MockCompletionModel`] returns a
//! canned reply; [`EchoCompletionModel`] returns the prompt itself, which
//! lets tests assert on exactly what the model was shown.

use async_trait::async_trait;

use crate::completion::CompletionModel;
use crate::embedding::EmbeddingProvider;
use crate::error::Result;

/// Deterministic hash-based embedding provider.
#[derive(Debug, Clone)]
pub struct MockEmbeddingProvider {
    dimensions: usize,
}

impl MockEmbeddingProvider {
    /// Create a provider emitting vectors of the given dimensionality.
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        // Deterministic embedding: hash the text bytes, then generate a
        // normalised vector whose direction depends on the content.
        let hash = text.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
        let mut emb = vec![0.0f32; self.dimensions];
        for (i, v) in emb.iter_mut().enumerate() {
            *v = ((hash.wrapping_add(i as u64)) as f32).sin();
        }
        // L2-normalise so cosine similarity is just the dot product.
        let norm: f32 = emb.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            emb.iter_mut().for_each(|x| *x /= norm);
        }
        Ok(emb)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Completion model that always returns the same reply.
#[derive(Debug, Clone)]
pub struct MockCompletionModel {
    reply: String,
}

impl MockCompletionModel {
    /// Create a model that answers every prompt with `reply`.
    pub fn new(reply: impl Into<String>) -> Self {
        Self { reply: reply.into() }
    }
}

#[async_trait]
impl CompletionModel for MockCompletionModel {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        Ok(self.reply.clone())
    }
}

/// Completion model that answers with the prompt it received.
#[derive(Debug, Clone, Default)]
pub struct EchoCompletionModel;

impl EchoCompletionModel {
    /// Create a new `EchoCompletionModel`.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CompletionModel for EchoCompletionModel {
    async fn complete(&self, prompt: &str) -> Result<String> {
        Ok(prompt.to_string())
    }
}
