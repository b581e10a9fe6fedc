//! # ragline
//!
//! Retrieval-augmented question answering over your own documents.
//!
//! ## Overview
//!
//! This crate covers the full path from raw documents to a cited answer:
//!
//! - [`TextExtractor`] / [`PlainTextExtractor`] - turn document bytes into pages
//! - [`WindowChunker`] - split pages into overlapping character windows
//! - [`Indexer`] - rebuild a collection: normalize → chunk → embed → store
//! - [`Retriever`] - embed a query and fetch its nearest chunks
//! - [`PromptAssembler`] - pack context into a prompt under a character budget
//! - [`AnswerPipeline`] - retrieve → assemble → complete, with citations
//!
//! Backends plug in through the [`EmbeddingProvider`], [`VectorStore`], and
//! [`CompletionModel`] traits. [`InMemoryVectorStore`] works out of the box;
//! the `openai` and `chroma` features add HTTP-backed implementations.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ragline::{
//!     AnswerPipeline, Indexer, InMemoryVectorStore, Page, RagConfig, DEFAULT_COLLECTION,
//! };
//!
//! let config = RagConfig::default();
//! let embedder = Arc::new(my_embedder);
//! let store = Arc::new(InMemoryVectorStore::new());
//!
//! let indexer = Indexer::builder()
//!     .config(config.clone())
//!     .embedding_provider(embedder.clone())
//!     .vector_store(store.clone())
//!     .build()?;
//!
//! let pages = vec![Page::new("handbook.txt", 1, "Refunds are issued within 14 days.")];
//! let report = indexer.build_index(DEFAULT_COLLECTION, &pages).await?;
//! println!("indexed {} chunks", report.chunks);
//!
//! let pipeline = AnswerPipeline::builder()
//!     .config(config)
//!     .embedding_provider(embedder)
//!     .vector_store(store)
//!     .completion_model(Arc::new(my_model))
//!     .build()?;
//!
//! let answer = pipeline.answer(DEFAULT_COLLECTION, "what is the refund window?").await?;
//! println!("{}", answer.text);
//! ```

pub mod chunking;
pub mod completion;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod extract;
pub mod indexer;
pub mod inmemory;
pub mod mock;
pub mod pipeline;
pub mod prompt;
pub mod retriever;
pub mod vectorstore;

#[cfg(feature = "chroma")]
pub mod chroma;
#[cfg(feature = "openai")]
pub mod openai;

mod timeout;

pub use chunking::{Chunker, WindowChunker};
pub use completion::CompletionModel;
pub use config::{RagConfig, RagConfigBuilder, DEFAULT_COLLECTION};
pub use document::{chunk_id, normalize_whitespace, Chunk, Page, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use extract::{PlainTextExtractor, TextExtractor};
pub use indexer::{IndexReport, Indexer, IndexerBuilder};
pub use inmemory::InMemoryVectorStore;
pub use mock::{EchoCompletionModel, MockCompletionModel, MockEmbeddingProvider};
pub use pipeline::{Answer, AnswerPipeline, AnswerPipelineBuilder, Citation};
pub use prompt::{AssembledPrompt, PromptAssembler};
pub use retriever::Retriever;
pub use vectorstore::{Metric, VectorStore};

#[cfg(feature = "chroma")]
pub use chroma::ChromaVectorStore;
#[cfg(feature = "openai")]
pub use openai::OpenAIEmbeddingProvider;
