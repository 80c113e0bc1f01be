//! # docqa-core
//!
//! Shared types for the docqa document question-answering pipeline:
//! the error type, the credential capability injected into both external
//! backends, and the [`ChatModel`] trait implemented by `docqa-model`.

mod chat;
mod credentials;
mod error;

pub use chat::ChatModel;
pub use credentials::{API_KEY_VAR, CredentialProvider, EnvCredential, StaticCredential};
pub use error::{CoreError, Result};
