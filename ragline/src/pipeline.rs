//! End-to-end question answering: retrieve → assemble → complete.
//!
//! The [`AnswerPipeline`] ties a [`Retriever`], a [`PromptAssembler`], and a
//! [`CompletionModel`] together to answer questions grounded in an indexed
//! collection, citing the sources that backed the answer.
//!
//! # Example
//!
//! ```rust,ignore
//! use ragline::{AnswerPipeline, RagConfig};
//!
//! let pipeline = AnswerPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(my_embedder))
//!     .vector_store(Arc::new(store))
//!     .completion_model(Arc::new(my_model))
//!     .build()?;
//!
//! let answer = pipeline.answer("docs", "what is the refund policy?").await?;
//! println!("{}", answer.text);
//! for citation in &answer.sources {
//!     println!("  {citation}");
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::completion::CompletionModel;
use crate::config::RagConfig;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::prompt::PromptAssembler;
use crate::retriever::Retriever;
use crate::timeout;
use crate::vectorstore::VectorStore;

/// A source reference attached to an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    /// Source document name.
    pub source: String,
    /// 1-based page number within the source.
    pub page: u32,
}

impl fmt::Display for Citation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (p.{})", self.source, self.page)
    }
}

/// A grounded answer with the sources that informed it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    /// The completion model's answer text.
    pub text: String,
    /// Sources of the context blocks that made it into the prompt, in
    /// retrieval order with duplicates removed. Chunks retrieved but cut
    /// by the context budget are not cited.
    pub sources: Vec<Citation>,
}

/// The question-answering orchestrator.
///
/// Coordinates query execution (embed → search → assemble → complete).
/// Construct one via [`AnswerPipeline::builder()`].
pub struct AnswerPipeline {
    config: RagConfig,
    retriever: Retriever,
    completion_model: Arc<dyn CompletionModel>,
    assembler: PromptAssembler,
}

impl fmt::Debug for AnswerPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnswerPipeline").field("config", &self.config).finish_non_exhaustive()
    }
}

impl AnswerPipeline {
    /// Create a new [`AnswerPipelineBuilder`].
    pub fn builder() -> AnswerPipelineBuilder {
        AnswerPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Answer `query` from the chunks indexed in `collection`.
    ///
    /// Retrieves the configured `top_k` nearest chunks, assembles as many
    /// of them as the context budget allows, and asks the completion model.
    /// When nothing relevant is indexed the model is still consulted with
    /// an empty context and instructed to say it does not know.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::CollectionNotFound`] if the collection has not
    /// been built, [`RagError::ServiceUnavailable`] on a missed deadline,
    /// and [`RagError::Completion`] if the model call fails.
    pub async fn answer(&self, collection: &str, query: &str) -> Result<Answer> {
        let results = self.retriever.retrieve(collection, query, self.config.top_k).await?;

        let contexts: Vec<&str> = results.iter().map(|r| r.chunk.text.as_str()).collect();
        let assembled = self.assembler.assemble(query, &contexts);

        let text = timeout::bounded(
            "completion model",
            self.config.service_timeout,
            self.completion_model.complete(&assembled.prompt),
        )
        .await
        .map_err(|e| {
            error!(collection, error = %e, "completion failed");
            e
        })?;

        let mut sources: Vec<Citation> = Vec::new();
        for result in &results[..assembled.included] {
            let citation =
                Citation { source: result.chunk.source.clone(), page: result.chunk.page };
            if !sources.contains(&citation) {
                sources.push(citation);
            }
        }

        info!(
            collection,
            retrieved = results.len(),
            included = assembled.included,
            source_count = sources.len(),
            "answer generated"
        );

        Ok(Answer { text, sources })
    }
}

/// Builder for constructing an [`AnswerPipeline`].
///
/// All fields are required. Call [`build()`](AnswerPipelineBuilder::build)
/// to validate and produce the pipeline.
///
/// # Example
///
/// ```rust,ignore
/// let pipeline = AnswerPipeline::builder()
///     .config(RagConfig::default())
///     .embedding_provider(Arc::new(embedder))
///     .vector_store(Arc::new(store))
///     .completion_model(Arc::new(model))
///     .build()?;
/// ```
#[derive(Default)]
pub struct AnswerPipelineBuilder {
    config: Option<RagConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    vector_store: Option<Arc<dyn VectorStore>>,
    completion_model: Option<Arc<dyn CompletionModel>>,
}

impl AnswerPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the vector store backend.
    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    /// Set the completion model that generates answers.
    pub fn completion_model(mut self, model: Arc<dyn CompletionModel>) -> Self {
        self.completion_model = Some(model);
        self
    }

    /// Build the [`AnswerPipeline`], validating that all required fields
    /// are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidConfiguration`] if any required field is
    /// missing.
    pub fn build(self) -> Result<AnswerPipeline> {
        let config = self
            .config
            .ok_or_else(|| RagError::InvalidConfiguration("config is required".to_string()))?;
        let embedding_provider = self.embedding_provider.ok_or_else(|| {
            RagError::InvalidConfiguration("embedding_provider is required".to_string())
        })?;
        let vector_store = self.vector_store.ok_or_else(|| {
            RagError::InvalidConfiguration("vector_store is required".to_string())
        })?;
        let completion_model = self.completion_model.ok_or_else(|| {
            RagError::InvalidConfiguration("completion_model is required".to_string())
        })?;

        let retriever = Retriever::new(embedding_provider, vector_store)
            .with_timeout(config.service_timeout);
        let assembler = PromptAssembler::new(config.context_budget);

        Ok(AnswerPipeline { config, retriever, completion_model, assembler })
    }
}
