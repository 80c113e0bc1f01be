//! The language-model trait used by the answering pipeline.

use async_trait::async_trait;

use crate::error::Result;

/// A chat language model that completes a single prompt.
///
/// The pipeline needs exactly one shape of call: prompt in, answer text
/// out, with deterministic decoding. Streaming, tool calling, and multi-turn
/// history are out of scope, so the trait does not model them.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// The model identifier, for logging.
    fn name(&self) -> &str;

    /// Generate the completion for `prompt`.
    ///
    /// A failed call must leave no state behind; callers may retry the same
    /// prompt against the same model without any reset.
    async fn generate(&self, prompt: &str) -> Result<String>;
}
