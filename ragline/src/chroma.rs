//! Chroma vector store backend.
//!
//! Provides [`ChromaVectorStore`] which implements [`VectorStore`] against
//! the [Chroma](https://www.trychroma.com/) REST API using `reqwest`.
//! This module is only available when the `chroma` feature is enabled.
//!
//! # Example
//!
//! ```rust,ignore
//! use ragline::chroma::ChromaVectorStore;
//! use ragline::Metric;
//!
//! let store = ChromaVectorStore::new("http://localhost:8000");
//! store.create_collection("docs", 384, Metric::Cosine).await?;
//! store.upsert("docs", &chunks).await?;
//! let results = store.search("docs", &query_embedding, 5).await?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::document::{Chunk, SearchResult};
use crate::error::{RagError, Result};
use crate::vectorstore::{Metric, VectorStore};

/// A [`VectorStore`] backed by a Chroma server.
///
/// Collections map to Chroma collections; the [`Metric`] picks the HNSW
/// space (`cosine` or `ip`). Chunk source and page are stored as document
/// metadata so search results come back fully attributed.
pub struct ChromaVectorStore {
    client: reqwest::Client,
    base_url: String,
}

impl ChromaVectorStore {
    /// Create a new Chroma vector store for the server at `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create a new Chroma vector store with the default URL
    /// (`http://localhost:8000`).
    pub fn default_url() -> Self {
        Self::new("http://localhost:8000")
    }

    fn collections_url(&self) -> String {
        format!("{}/api/v1/collections", self.base_url)
    }

    fn map_err(e: reqwest::Error) -> RagError {
        RagError::Store { backend: "chroma".to_string(), message: e.to_string() }
    }

    fn api_error(context: &str, status: reqwest::StatusCode, body: String) -> RagError {
        RagError::Store {
            backend: "chroma".to_string(),
            message: format!("{context}: server returned {status}: {body}"),
        }
    }

    /// Resolve a collection name to its Chroma collection ID.
    async fn collection_id(&self, name: &str) -> Result<String> {
        let response = self
            .client
            .get(format!("{}/{name}", self.collections_url()))
            .send()
            .await
            .map_err(Self::map_err)?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(RagError::CollectionNotFound(name.to_string()));
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            // Chroma reports a missing collection as a ValueError, not a 404.
            if body.contains("does not exist") {
                return Err(RagError::CollectionNotFound(name.to_string()));
            }
            return Err(Self::api_error("get collection", status, body));
        }

        let info: CollectionInfo = response.json().await.map_err(Self::map_err)?;
        Ok(info.id)
    }
}

// ── Chroma API request/response types ──────────────────────────────

#[derive(Serialize)]
struct CreateCollectionRequest<'a> {
    name: &'a str,
    metadata: SpaceMetadata<'a>,
    get_or_create: bool,
}

#[derive(Serialize)]
struct SpaceMetadata<'a> {
    #[serde(rename = "hnsw:space")]
    space: &'a str,
}

#[derive(Deserialize)]
struct CollectionInfo {
    id: String,
}

#[derive(Serialize, Deserialize)]
struct ChunkMetadata {
    source: String,
    page: u32,
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    ids: Vec<&'a str>,
    embeddings: Vec<&'a [f32]>,
    documents: Vec<&'a str>,
    metadatas: Vec<ChunkMetadata>,
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    query_embeddings: Vec<&'a [f32]>,
    n_results: usize,
    include: [&'a str; 3],
}

#[derive(Deserialize)]
struct QueryResponse {
    ids: Vec<Vec<String>>,
    documents: Option<Vec<Vec<Option<String>>>>,
    metadatas: Option<Vec<Vec<Option<ChunkMetadata>>>>,
    distances: Option<Vec<Vec<f32>>>,
}

// ── VectorStore implementation ─────────────────────────────────────

#[async_trait]
impl VectorStore for ChromaVectorStore {
    async fn create_collection(
        &self,
        name: &str,
        _dimensions: usize,
        metric: Metric,
    ) -> Result<()> {
        let space = match metric {
            Metric::Cosine => "cosine",
            Metric::Dot => "ip",
        };
        let request = CreateCollectionRequest {
            name,
            metadata: SpaceMetadata { space },
            get_or_create: true,
        };

        let response = self
            .client
            .post(self.collections_url())
            .json(&request)
            .send()
            .await
            .map_err(Self::map_err)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(collection = name, %status, "failed to create chroma collection");
            return Err(Self::api_error("create collection", status, body));
        }

        debug!(collection = name, space, "created chroma collection");
        Ok(())
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        let response = self
            .client
            .delete(format!("{}/{name}", self.collections_url()))
            .send()
            .await
            .map_err(Self::map_err)?;

        let status = response.status();
        if status.is_success() || status == reqwest::StatusCode::NOT_FOUND {
            debug!(collection = name, "deleted chroma collection");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        // Deleting a collection that was never created is not an error.
        if body.contains("does not exist") {
            return Ok(());
        }
        Err(Self::api_error("delete collection", status, body))
    }

    async fn upsert(&self, collection: &str, chunks: &[Chunk]) -> Result<()> {
        if chunks.is_empty() {
            return Ok(());
        }

        let id = self.collection_id(collection).await?;
        let request = UpsertRequest {
            ids: chunks.iter().map(|c| c.id.as_str()).collect(),
            embeddings: chunks.iter().map(|c| c.embedding.as_slice()).collect(),
            documents: chunks.iter().map(|c| c.text.as_str()).collect(),
            metadatas: chunks
                .iter()
                .map(|c| ChunkMetadata { source: c.source.clone(), page: c.page })
                .collect(),
        };

        let response = self
            .client
            .post(format!("{}/{id}/upsert", self.collections_url()))
            .json(&request)
            .send()
            .await
            .map_err(Self::map_err)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(collection, %status, "chroma upsert failed");
            return Err(Self::api_error("upsert", status, body));
        }

        debug!(collection, count = chunks.len(), "upserted chunks to chroma");
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        let id = self.collection_id(collection).await?;
        let request = QueryRequest {
            query_embeddings: vec![embedding],
            n_results: top_k,
            include: ["documents", "metadatas", "distances"],
        };

        let response = self
            .client
            .post(format!("{}/{id}/query", self.collections_url()))
            .json(&request)
            .send()
            .await
            .map_err(Self::map_err)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(collection, %status, "chroma query failed");
            return Err(Self::api_error("query", status, body));
        }

        let parsed: QueryResponse = response.json().await.map_err(Self::map_err)?;

        // One query embedding in, so every result list has exactly one row.
        let ids = parsed.ids.into_iter().next().unwrap_or_default();
        let documents =
            parsed.documents.and_then(|d| d.into_iter().next()).unwrap_or_default();
        let metadatas =
            parsed.metadatas.and_then(|m| m.into_iter().next()).unwrap_or_default();
        let distances =
            parsed.distances.and_then(|d| d.into_iter().next()).unwrap_or_default();

        let results = ids
            .into_iter()
            .enumerate()
            .map(|(i, chunk_id)| {
                let text = documents.get(i).and_then(|d| d.clone()).unwrap_or_default();
                let (source, page) = metadatas
                    .get(i)
                    .and_then(|m| m.as_ref())
                    .map(|m| (m.source.clone(), m.page))
                    .unwrap_or_default();
                // Chroma reports distances; similarity is 1 - distance for
                // both supported spaces.
                let score = distances.get(i).map(|d| 1.0 - d).unwrap_or(0.0);

                SearchResult {
                    chunk: Chunk { id: chunk_id, text, embedding: vec![], source, page },
                    score,
                }
            })
            .collect();

        Ok(results)
    }
}
