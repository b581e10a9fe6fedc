//! Configuration for the indexing and answering pipelines.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// The collection name used by the demos and tests when none is given.
pub const DEFAULT_COLLECTION: &str = "docs";

/// Configuration parameters shared by the [`Indexer`](crate::Indexer) and
/// the [`AnswerPipeline`](crate::AnswerPipeline).
///
/// The defaults reproduce the reference corpus settings: 800-character
/// chunks with a 200-character overlap, embedding batches of 256, the five
/// nearest neighbors per query, and a 3200-character context budget.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RagConfig {
    /// Maximum chunk size in characters.
    pub chunk_size: usize,
    /// Number of overlapping characters between consecutive chunks.
    pub chunk_overlap: usize,
    /// Number of chunks embedded and upserted per store round trip.
    pub batch_size: usize,
    /// Number of nearest neighbors requested per query.
    pub top_k: usize,
    /// Maximum number of characters of retrieved context per prompt.
    pub context_budget: usize,
    /// Timeout applied to every external service call; `None` disables it.
    pub service_timeout: Option<Duration>,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            chunk_size: 800,
            chunk_overlap: 200,
            batch_size: 256,
            top_k: 5,
            context_budget: 3200,
            service_timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Set the maximum chunk size in characters.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the overlap between consecutive chunks in characters.
    pub fn chunk_overlap(mut self, overlap: usize) -> Self {
        self.config.chunk_overlap = overlap;
        self
    }

    /// Set the number of chunks per embedding/upsert batch.
    pub fn batch_size(mut self, size: usize) -> Self {
        self.config.batch_size = size;
        self
    }

    /// Set the number of nearest neighbors requested per query.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the maximum number of context characters packed into a prompt.
    pub fn context_budget(mut self, budget: usize) -> Self {
        self.config.context_budget = budget;
        self
    }

    /// Set the timeout for external service calls, or `None` to wait
    /// indefinitely.
    pub fn service_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.service_timeout = timeout;
        self
    }

    /// Build the [`RagConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidConfiguration`] if:
    /// - `chunk_size == 0`
    /// - `chunk_overlap >= chunk_size`
    /// - `batch_size == 0`
    /// - `top_k == 0`
    pub fn build(self) -> Result<RagConfig> {
        if self.config.chunk_size == 0 {
            return Err(RagError::InvalidConfiguration(
                "chunk_size must be greater than zero".to_string(),
            ));
        }
        if self.config.chunk_overlap >= self.config.chunk_size {
            return Err(RagError::InvalidConfiguration(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                self.config.chunk_overlap, self.config.chunk_size
            )));
        }
        if self.config.batch_size == 0 {
            return Err(RagError::InvalidConfiguration(
                "batch_size must be greater than zero".to_string(),
            ));
        }
        if self.config.top_k == 0 {
            return Err(RagError::InvalidConfiguration(
                "top_k must be greater than zero".to_string(),
            ));
        }
        Ok(self.config)
    }
}
