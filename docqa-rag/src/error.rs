//! Error types for the `docqa-rag` crate.

use thiserror::Error;

/// Errors that can occur while building or querying a document index.
#[derive(Debug, Error)]
pub enum RagError {
    /// A document could not be read or parsed.
    #[error("Read error: {0}")]
    Read(String),

    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The vector index could not be updated, persisted, or reloaded.
    #[error("Index error: {0}")]
    Index(String),

    /// A query string failed validation.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An error in pipeline orchestration.
    #[error("Pipeline error: {0}")]
    Pipeline(String),

    /// An error propagated from `docqa-core`.
    #[error(transparent)]
    Core(#[from] docqa_core::CoreError),
}

/// A convenience result type for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;
