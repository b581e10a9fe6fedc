//! Error types for the `ragline` crate.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while indexing, retrieving, or answering.
#[derive(Debug, Error)]
pub enum RagError {
    /// Rejected chunking or pipeline parameters.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// No document page contained any text after whitespace normalization.
    #[error("No documents found: every page was empty after whitespace normalization")]
    EmptyCorpus,

    /// A collection create, delete, or upsert failed mid-build.
    ///
    /// The build is aborted; the collection must be rebuilt from scratch.
    #[error("Index write failure ({operation} on '{collection}'): {message}")]
    IndexWriteFailure {
        /// The store operation that failed (`create`, `delete`, or `upsert`).
        operation: String,
        /// The collection the build was writing.
        collection: String,
        /// A description of the failure.
        message: String,
    },

    /// A query was issued against a collection that was never built.
    #[error("Collection '{0}' not found; build the index first")]
    CollectionNotFound(String),

    /// An external service did not respond within the configured timeout.
    #[error("Service unavailable: {service} did not respond within {timeout:?}")]
    ServiceUnavailable {
        /// The external collaborator that timed out.
        service: String,
        /// The timeout that elapsed.
        timeout: Duration,
    },

    /// An error occurred in the embedding service.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the vector store backend.
    #[error("Vector store error ({backend}): {message}")]
    Store {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the text completion service.
    #[error("Completion error: {0}")]
    Completion(String),

    /// An error occurred during text extraction.
    #[error("Extraction error: {0}")]
    Extraction(String),
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;
