//! Credential resolution for the embedding and language-model backends.
//!
//! Both backends share one API key. The key is resolved exactly once at
//! process start and passed explicitly into the client constructors; no
//! global mutable state is involved.

use crate::error::{CoreError, Result};

/// The environment variable both backends read their API key from.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// A capability that yields the API credential for external calls.
pub trait CredentialProvider: Send + Sync {
    /// Return the API key.
    ///
    /// Implementations must be deterministic after the first successful
    /// resolution: once a key has been produced, later calls return the
    /// same key without further lookups.
    fn api_key(&self) -> Result<String>;
}

/// A fixed credential, for tests and for callers that resolved the key
/// themselves (for example via an interactive prompt).
#[derive(Debug, Clone)]
pub struct StaticCredential {
    key: String,
}

impl StaticCredential {
    /// Create a provider that always returns `key`.
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl CredentialProvider for StaticCredential {
    fn api_key(&self) -> Result<String> {
        Ok(self.key.clone())
    }
}

/// Reads the credential from a process environment variable.
///
/// Returns [`CoreError::Credential`] when the variable is absent or empty;
/// the caller decides whether to prompt the user or abort.
#[derive(Debug, Clone)]
pub struct EnvCredential {
    var: String,
}

impl EnvCredential {
    /// Read from [`API_KEY_VAR`].
    pub fn new() -> Self {
        Self::from_var(API_KEY_VAR)
    }

    /// Read from a custom environment variable.
    pub fn from_var(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvCredential {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialProvider for EnvCredential {
    fn api_key(&self) -> Result<String> {
        match std::env::var(&self.var) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(CoreError::Credential(format!(
                "{} is not set in the environment",
                self.var
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_credential_returns_key() {
        let provider = StaticCredential::new("sk-test");
        assert_eq!(provider.api_key().unwrap(), "sk-test");
    }

    #[test]
    fn env_credential_missing_var_is_an_error() {
        let provider = EnvCredential::from_var("DOCQA_TEST_KEY_THAT_IS_NEVER_SET");
        let err = provider.api_key().unwrap_err();
        assert!(matches!(err, CoreError::Credential(_)));
    }
}
