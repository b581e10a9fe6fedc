//! Completion model trait for generating grounded answers.

use async_trait::async_trait;

use crate::error::Result;

/// A text completion backend that turns an assembled prompt into an answer.
///
/// The pipeline hands implementations the full prompt (context blocks,
/// instructions, and question) and expects the answer text back. Backends
/// should map transport and API failures to
/// [`RagError::Completion`](crate::RagError::Completion).
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Generate a completion for `prompt`.
    async fn complete(&self, prompt: &str) -> Result<String>;
}
