//! Index construction: normalize → chunk → embed → store.
//!
//! The [`Indexer`] rebuilds a named collection from a set of [`Page`]s by
//! composing a [`Chunker`], an [`EmbeddingProvider`], and a [`VectorStore`].
//!
//! # Example
//!
//! ```rust,ignore
//! use ragline::{Indexer, RagConfig, InMemoryVectorStore};
//!
//! let indexer = Indexer::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(my_embedder))
//!     .vector_store(Arc::new(InMemoryVectorStore::new()))
//!     .build()?;
//!
//! let report = indexer.build_index("docs", &pages).await?;
//! println!("{} chunks from {} pages", report.chunks, report.pages);
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::chunking::{Chunker, WindowChunker};
use crate::config::RagConfig;
use crate::document::{chunk_id, normalize_whitespace, Chunk, Page};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::timeout;
use crate::vectorstore::{Metric, VectorStore};

/// Summary of a completed index build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexReport {
    /// Pages that contributed at least one chunk.
    pub pages: usize,
    /// Pages dropped because they were empty after whitespace normalization.
    pub skipped_pages: usize,
    /// Total chunks embedded and stored.
    pub chunks: usize,
}

/// Builds a searchable collection from extracted pages.
///
/// Each build is a full rebuild: the target collection is deleted and
/// recreated, so stale chunks from earlier runs never linger. Chunk IDs are
/// derived from source name, page number, and window position, which makes
/// rebuilding the same corpus produce the same IDs. Builds do not lock the
/// collection; callers must serialize concurrent builds against the same
/// name. Construct one via [`Indexer::builder()`].
pub struct Indexer {
    config: RagConfig,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    chunker: Arc<dyn Chunker>,
}

impl std::fmt::Debug for Indexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Indexer").field("config", &self.config).finish_non_exhaustive()
    }
}

/// Wrap a store failure, letting deadline errors pass through unchanged.
fn index_write_error(operation: &str, collection: &str, err: RagError) -> RagError {
    match err {
        e @ RagError::ServiceUnavailable { .. } => e,
        e => RagError::IndexWriteFailure {
            operation: operation.to_string(),
            collection: collection.to_string(),
            message: e.to_string(),
        },
    }
}

impl Indexer {
    /// Create a new [`IndexerBuilder`].
    pub fn builder() -> IndexerBuilder {
        IndexerBuilder::default()
    }

    /// Return a reference to the indexer configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Rebuild `collection` from `pages`.
    ///
    /// Page text is whitespace-normalized first; pages empty after
    /// normalization are skipped and counted in the report. Remaining pages
    /// are chunked, embedded in batches of `batch_size`, and upserted. The
    /// collection is dropped and recreated before any write, so the corpus
    /// is validated before existing data is touched.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::EmptyCorpus`] if no page yields any text,
    /// [`RagError::IndexWriteFailure`] if a store operation fails, and
    /// [`RagError::ServiceUnavailable`] if the embedding backend or store
    /// misses the configured deadline.
    pub async fn build_index(&self, collection: &str, pages: &[Page]) -> Result<IndexReport> {
        let mut chunks: Vec<Chunk> = Vec::new();
        let mut kept_pages = 0;
        let mut skipped_pages = 0;

        for page in pages {
            let text = normalize_whitespace(&page.text);
            if text.is_empty() {
                skipped_pages += 1;
                continue;
            }
            kept_pages += 1;
            for (seq, window) in self.chunker.chunk(&text).into_iter().enumerate() {
                chunks.push(Chunk {
                    id: chunk_id(&page.source, page.number, seq),
                    text: window,
                    embedding: Vec::new(),
                    source: page.source.clone(),
                    page: page.number,
                });
            }
        }

        // Validate before mutating the store; an existing index survives an
        // empty rebuild attempt.
        if chunks.is_empty() {
            error!(collection, page_count = pages.len(), "no text to index");
            return Err(RagError::EmptyCorpus);
        }

        let limit = self.config.service_timeout;

        timeout::bounded("vector store", limit, self.vector_store.delete_collection(collection))
            .await
            .map_err(|e| {
                error!(collection, error = %e, "failed to drop previous collection");
                index_write_error("delete_collection", collection, e)
            })?;

        let dimensions = self.embedding_provider.dimensions();
        timeout::bounded(
            "vector store",
            limit,
            self.vector_store.create_collection(collection, dimensions, Metric::Cosine),
        )
        .await
        .map_err(|e| {
            error!(collection, error = %e, "failed to create collection");
            index_write_error("create_collection", collection, e)
        })?;

        for batch in chunks.chunks_mut(self.config.batch_size) {
            let texts: Vec<&str> = batch.iter().map(|c| c.text.as_str()).collect();
            let embeddings = timeout::bounded(
                "embedding provider",
                limit,
                self.embedding_provider.embed_batch(&texts),
            )
            .await
            .map_err(|e| {
                error!(collection, error = %e, "embedding failed during index build");
                e
            })?;

            for (chunk, embedding) in batch.iter_mut().zip(embeddings) {
                chunk.embedding = embedding;
            }

            timeout::bounded("vector store", limit, self.vector_store.upsert(collection, batch))
                .await
                .map_err(|e| {
                    error!(collection, error = %e, "upsert failed during index build");
                    index_write_error("upsert", collection, e)
                })?;

            debug!(collection, batch_size = batch.len(), "stored batch");
        }

        let report =
            IndexReport { pages: kept_pages, skipped_pages, chunks: chunks.len() };
        info!(
            collection,
            pages = report.pages,
            skipped_pages = report.skipped_pages,
            chunk_count = report.chunks,
            "built index"
        );

        Ok(report)
    }
}

/// Builder for constructing an [`Indexer`].
///
/// `config`, `embedding_provider`, and `vector_store` are required. The
/// chunker defaults to a [`WindowChunker`] sized from the configuration.
///
/// # Example
///
/// ```rust,ignore
/// let indexer = Indexer::builder()
///     .config(RagConfig::default())
///     .embedding_provider(Arc::new(embedder))
///     .vector_store(Arc::new(store))
///     .build()?;
/// ```
#[derive(Default)]
pub struct IndexerBuilder {
    config: Option<RagConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    vector_store: Option<Arc<dyn VectorStore>>,
    chunker: Option<Arc<dyn Chunker>>,
}

impl IndexerBuilder {
    /// Set the indexer configuration.
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

    /// Set a custom chunker, replacing the default [`WindowChunker`].
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Build the [`Indexer`], validating that all required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidConfiguration`] if a required field is
    /// missing or the configured chunk geometry is invalid.
    pub fn build(self) -> Result<Indexer> {
        let config = self
            .config
            .ok_or_else(|| RagError::InvalidConfiguration("config is required".to_string()))?;
        let embedding_provider = self.embedding_provider.ok_or_else(|| {
            RagError::InvalidConfiguration("embedding_provider is required".to_string())
        })?;
        let vector_store = self.vector_store.ok_or_else(|| {
            RagError::InvalidConfiguration("vector_store is required".to_string())
        })?;
        if config.batch_size == 0 {
            return Err(RagError::InvalidConfiguration(
                "batch_size must be greater than zero".to_string(),
            ));
        }
        let chunker: Arc<dyn Chunker> = match self.chunker {
            Some(chunker) => chunker,
            None => Arc::new(WindowChunker::new(config.chunk_size, config.chunk_overlap)?),
        };

        Ok(Indexer { config, embedding_provider, vector_store, chunker })
    }
}
