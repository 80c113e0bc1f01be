//! Deterministic stand-in model for tests and offline runs.

use async_trait::async_trait;
use docqa_core::{ChatModel, Result};

/// A model that answers by echoing the prompt it was given.
///
/// Useful for exercising the retrieval pipeline end to end without a
/// network: whatever context was stuffed into the prompt comes back in the
/// answer, so assertions can check that retrieval surfaced the right text.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoModel;

#[async_trait]
impl ChatModel for EchoModel {
    fn name(&self) -> &str {
        "echo"
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        Ok(prompt.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn echo_returns_prompt_verbatim() {
        let model = EchoModel;
        let answer = model.generate("Revenue was $12M.").await.unwrap();
        assert_eq!(answer, "Revenue was $12M.");
        assert_eq!(model.name(), "echo");
    }
}
