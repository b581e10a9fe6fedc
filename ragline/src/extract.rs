//! Text extraction from source documents.
//!
//! Extractors turn raw document bytes into a sequence of [`Page`]s keyed by
//! the source name. The built-in [`PlainTextExtractor`] handles plain text;
//! richer formats plug in through the [`TextExtractor`] trait.

use async_trait::async_trait;

use crate::document::Page;
use crate::error::Result;

/// Extracts per-page text from a raw document.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract pages from `bytes`, labeling each with `source_name`.
    ///
    /// Page numbers are 1-based. Pages with no extractable text should
    /// still be emitted; the indexer drops empty pages after whitespace
    /// normalization so reports can account for them.
    async fn extract(&self, source_name: &str, bytes: &[u8]) -> Result<Vec<Page>>;
}

/// Extractor for plain UTF-8 text documents.
///
/// Input is decoded lossily, so invalid byte sequences become replacement
/// characters rather than failing the document. Form feed characters
/// (`\u{c}`) act as page breaks; a document without them is a single page.
#[derive(Debug, Clone, Default)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    /// Create a new `PlainTextExtractor`.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, source_name: &str, bytes: &[u8]) -> Result<Vec<Page>> {
        let text = String::from_utf8_lossy(bytes);
        let pages = text
            .split('\u{c}')
            .enumerate()
            .map(|(i, body)| Page::new(source_name, (i + 1) as u32, body))
            .collect();
        Ok(pages)
    }
}
