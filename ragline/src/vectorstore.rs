//! Vector store trait for storing and searching vector embeddings.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::document::{Chunk, SearchResult};
use crate::error::Result;

/// Similarity metric used when a collection is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Cosine similarity. Safe for unnormalized vectors.
    Cosine,
    /// Raw dot product. Assumes vectors are already L2-normalized.
    Dot,
}

/// A storage backend for vector embeddings with similarity search.
///
/// Implementations manage named collections of [`Chunk`]s and support
/// upserting and searching by vector similarity.
///
/// # Example
///
/// ```rust,ignore
/// use ragline::{InMemoryVectorStore, Metric, VectorStore};
///
/// let store = InMemoryVectorStore::new();
/// store.create_collection("docs", 384, Metric::Cosine).await?;
/// store.upsert("docs", &chunks).await?;
/// let results = store.search("docs", &query_embedding, 5).await?;
/// ```
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create a named collection. No-op if it already exists.
    async fn create_collection(&self, name: &str, dimensions: usize, metric: Metric) -> Result<()>;

    /// Delete a named collection and all its data. No-op if it does not exist.
    async fn delete_collection(&self, name: &str) -> Result<()>;

    /// Upsert chunks into a collection. Chunks must have embeddings set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::CollectionNotFound`](crate::RagError::CollectionNotFound)
    /// if the collection has not been created.
    async fn upsert(&self, collection: &str, chunks: &[Chunk]) -> Result<()>;

    /// Search for the `top_k` most similar chunks to the given embedding.
    ///
    /// Returns results ordered by descending similarity score. Fewer than
    /// `top_k` results are returned when the collection holds fewer chunks.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::CollectionNotFound`](crate::RagError::CollectionNotFound)
    /// if the collection has not been created.
    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>>;
}
