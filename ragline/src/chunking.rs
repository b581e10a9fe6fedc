//! Document chunking.
//!
//! This module provides the [`Chunker`] trait and [`WindowChunker`], which
//! splits page text into fixed-size overlapping character windows. Chunkers
//! produce plain text windows; identifiers and page metadata are attached
//! by the [`Indexer`](crate::Indexer).

use crate::error::{RagError, Result};

/// A strategy for splitting a page's normalized text into chunks.
///
/// Returns windows in left-to-right order. Every character of the input
/// must be covered by at least one window.
pub trait Chunker: Send + Sync {
    /// Split `text` into ordered chunks.
    ///
    /// Returns an empty `Vec` if `text` is empty.
    fn chunk(&self, text: &str) -> Vec<String>;
}

/// Splits text into fixed-size character windows with a configured overlap.
///
/// Windows are measured in characters and cut on character boundaries, so
/// multi-byte text never splits mid-codepoint. Consecutive windows start
/// `size - overlap` characters apart; the final window may be shorter than
/// `size`. Text no longer than `size` yields a single window equal to the
/// whole input.
///
/// # Example
///
/// ```rust,ignore
/// use ragline::WindowChunker;
///
/// let chunker = WindowChunker::new(800, 200)?;
/// let windows = chunker.chunk(&page_text);
/// ```
#[derive(Debug, Clone)]
pub struct WindowChunker {
    size: usize,
    overlap: usize,
}

impl WindowChunker {
    /// Create a new `WindowChunker`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidConfiguration`] unless `size > 0` and
    /// `overlap < size`.
    pub fn new(size: usize, overlap: usize) -> Result<Self> {
        if size == 0 {
            return Err(RagError::InvalidConfiguration(
                "chunk size must be greater than zero".to_string(),
            ));
        }
        if overlap >= size {
            return Err(RagError::InvalidConfiguration(format!(
                "chunk overlap ({overlap}) must be less than chunk size ({size})"
            )));
        }
        Ok(Self { size, overlap })
    }
}

impl Chunker for WindowChunker {
    fn chunk(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }

        // Byte offset of every character boundary, with an end sentinel.
        let bounds: Vec<usize> =
            text.char_indices().map(|(i, _)| i).chain([text.len()]).collect();
        let chars = bounds.len() - 1;

        if chars <= self.size {
            return vec![text.to_string()];
        }

        let step = self.size - self.overlap;
        let mut windows = Vec::with_capacity(chars / step + 1);
        let mut start = 0;
        while start < chars {
            let end = (start + self.size).min(chars);
            windows.push(text[bounds[start]..bounds[end]].to_string());
            start += step;
        }
        windows
    }
}
