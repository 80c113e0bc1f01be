//! Chat completion client for the OpenAI API.

use std::time::Duration;

use async_trait::async_trait;
use docqa_core::{ChatModel, CoreError, CredentialProvider, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

/// The default OpenAI chat completions endpoint.
const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

/// The default chat model.
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Bound on a single API call; expiry is fatal for that call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// A [`ChatModel`] backed by the OpenAI chat completions API.
///
/// Decoding is deterministic: every request is sent with temperature 0.0,
/// so a repeated prompt yields a repeatable answer.
///
/// # Example
///
/// ```rust,ignore
/// use docqa_model::OpenAiChatModel;
///
/// let model = OpenAiChatModel::new(&credentials)?;
/// let answer = model.generate("What was Q2 revenue?").await?;
/// ```
pub struct OpenAiChatModel {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl OpenAiChatModel {
    /// Create a client using the given credential provider.
    ///
    /// The credential is resolved once, here; a missing key surfaces
    /// immediately rather than on the first call.
    pub fn new(credentials: &dyn CredentialProvider) -> Result<Self> {
        let api_key = credentials.api_key()?;
        if api_key.is_empty() {
            return Err(CoreError::Credential("API key must not be empty".into()));
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CoreError::Model(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            model: DEFAULT_MODEL.into(),
        })
    }

    /// Set the model name (e.g. `gpt-4o`).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

// ── OpenAI API request/response types ──────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

// ── ChatModel implementation ───────────────────────────────────────

#[async_trait]
impl ChatModel for OpenAiChatModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        debug!(model = %self.model, prompt_len = prompt.len(), "generating completion");

        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: 0.0,
        };

        let response = self
            .client
            .post(OPENAI_CHAT_URL)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(model = %self.model, error = %e, "request failed");
                CoreError::Model(format!("request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            error!(model = %self.model, %status, "API error");
            return Err(CoreError::Model(format!("API returned {status}: {detail}")));
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            error!(model = %self.model, error = %e, "failed to parse response");
            CoreError::Model(format!("failed to parse response: {e}"))
        })?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| CoreError::Model("API returned no completion".into()))
    }
}
