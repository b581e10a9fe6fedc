//! Nearest-neighbor retrieval over an indexed collection.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use crate::document::SearchResult;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::timeout;
use crate::vectorstore::VectorStore;

/// Embeds a query and searches a collection for its nearest chunks.
///
/// The retriever does not reorder or filter what the store returns beyond
/// the store's own descending-score ordering; prompt assembly decides how
/// much of it to use.
pub struct Retriever {
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    service_timeout: Option<Duration>,
}

impl std::fmt::Debug for Retriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retriever")
            .field("service_timeout", &self.service_timeout)
            .finish_non_exhaustive()
    }
}

impl Retriever {
    /// Create a retriever over the given provider and store, with no
    /// deadline on external calls.
    pub fn new(
        embedding_provider: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStore>,
    ) -> Self {
        Self { embedding_provider, vector_store, service_timeout: None }
    }

    /// Set a deadline for each embedding and store call.
    pub fn with_timeout(mut self, service_timeout: Option<Duration>) -> Self {
        self.service_timeout = service_timeout;
        self
    }

    /// Retrieve the `k` chunks nearest to `query` from `collection`.
    ///
    /// Returns results in descending score order. Fewer than `k` results
    /// come back when the collection holds fewer chunks; that is not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidConfiguration`] if `k` is zero,
    /// [`RagError::CollectionNotFound`] if the collection has not been
    /// built, and [`RagError::ServiceUnavailable`] on a missed deadline.
    pub async fn retrieve(
        &self,
        collection: &str,
        query: &str,
        k: usize,
    ) -> Result<Vec<SearchResult>> {
        if k == 0 {
            return Err(RagError::InvalidConfiguration(
                "retrieval count k must be greater than zero".to_string(),
            ));
        }

        let query_embedding = timeout::bounded(
            "embedding provider",
            self.service_timeout,
            self.embedding_provider.embed(query),
        )
        .await
        .map_err(|e| {
            error!(error = %e, "query embedding failed");
            e
        })?;

        let results = timeout::bounded(
            "vector store",
            self.service_timeout,
            self.vector_store.search(collection, &query_embedding, k),
        )
        .await
        .map_err(|e| {
            error!(collection, error = %e, "vector search failed");
            e
        })?;

        info!(collection, result_count = results.len(), "retrieval completed");
        Ok(results)
    }
}
