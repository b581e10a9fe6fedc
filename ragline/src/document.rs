//! Data types for document pages, chunks, and search results.

use serde::{Deserialize, Serialize};

/// One page of extracted text from a named source document.
///
/// Pages are produced by a [`TextExtractor`](crate::extract::TextExtractor)
/// (or built by hand) and consumed by the [`Indexer`](crate::Indexer).
/// They are never persisted themselves; only the derived [`Chunk`]s are.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page {
    /// Name of the source document (e.g. a file name), unique per run.
    pub source: String,
    /// 1-based page number within the source.
    pub number: u32,
    /// Raw extracted text, not yet whitespace-normalized.
    pub text: String,
}

impl Page {
    /// Create a page from its source name, 1-based number, and raw text.
    pub fn new(source: impl Into<String>, number: u32, text: impl Into<String>) -> Self {
        Self { source: source.into(), number, text: text.into() }
    }
}

/// A contiguous window of a page's normalized text, the unit stored and
/// retrieved.
///
/// The `embedding` field starts empty; the [`Indexer`](crate::Indexer)
/// attaches vectors batch by batch before upserting into the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Deterministic identifier, `"{source}-{page}-chunk{seq}"`.
    pub id: String,
    /// The text content of the chunk (whitespace-normalized, non-empty).
    pub text: String,
    /// The vector embedding for this chunk's text.
    pub embedding: Vec<f32>,
    /// Name of the source document this chunk came from.
    pub source: String,
    /// 1-based page number this chunk came from.
    pub page: u32,
}

/// A retrieved [`Chunk`] paired with a relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// The similarity score (higher is more relevant).
    pub score: f32,
}

/// Build the deterministic chunk identifier for a page-local sequence
/// index.
///
/// Re-indexing the same `(source, page, seq)` triple always produces the
/// same id, so upserts replace rather than duplicate.
pub fn chunk_id(source: &str, page: u32, seq: usize) -> String {
    format!("{source}-{page}-chunk{seq}")
}

/// Collapse every run of whitespace to a single space and trim the ends.
///
/// Pages whose normalized text is empty are dropped by the indexer.
pub fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}
