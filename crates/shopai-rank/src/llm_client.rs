// LLM client abstraction
// Every provider (Gemini, Groq, Ollama) implements this trait; the engine only sees text in, text out.

use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("LLM API error: {0}")]
    ApiError(String),

    #[error("Missing API key")]
    MissingApiKey,

    #[error("LLM returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        LlmError::RequestFailed(err.to_string())
    }
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate text from a prompt. `model` overrides the client's default model.
    async fn generate(&self, prompt: &str, model: Option<&str>) -> Result<String, LlmError>;

    /// Model used when no override is passed
    fn model(&self) -> &str;

    /// Provider name, used in logs and responses
    fn provider(&self) -> &str;
}

/// System instruction shared by all providers
pub(crate) const SYSTEM_PROMPT: &str =
    "You are a product recommendation assistant. Answer with a JSON array of product IDs and nothing else.";

/// Send a JSON body and decode a JSON reply. Non-2xx statuses and
/// undecodable bodies become `ApiError`; transport errors `RequestFailed`.
pub(crate) async fn post_json<B, R>(request: RequestBuilder, body: &B) -> Result<R, LlmError>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let response = request.json(body).send().await?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(LlmError::ApiError(format!("{}: {}", status, error_text)));
    }

    response
        .json()
        .await
        .map_err(|e| LlmError::ApiError(format!("Failed to parse response: {}", e)))
}
