//! Error types shared across the docqa crates.

use thiserror::Error;

/// Errors produced by core capabilities.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The API credential could not be resolved.
    #[error("Credential error: {0}")]
    Credential(String),

    /// A language model call failed.
    #[error("Model error: {0}")]
    Model(String),

    /// An underlying I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A convenience result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
