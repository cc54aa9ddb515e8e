// Groq Cloud LLM client (OpenAI-compatible chat completions)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::llm_client::{post_json, LlmClient, LlmError, SYSTEM_PROMPT};

#[derive(Debug, Clone)]
pub struct GroqClient {
    client: Client,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

impl ChatResponse {
    fn into_text(self) -> Result<String, LlmError> {
        self.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(LlmError::EmptyResponse)
    }
}

impl GroqClient {
    const BASE_URL: &'static str = "https://api.groq.com/openai/v1/chat/completions";
    pub const DEFAULT_MODEL: &'static str = "llama-3.3-70b-versatile";

    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl LlmClient for GroqClient {
    async fn generate(&self, prompt: &str, model: Option<&str>) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: model.unwrap_or(&self.model),
            messages: vec![
                Message {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                Message {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: 0.2,
            max_tokens: 256,
        };
        let http = self.client.post(Self::BASE_URL).bearer_auth(&self.api_key);
        let result: ChatResponse = post_json(http, &request).await?;
        result.into_text()
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn provider(&self) -> &str {
        "groq"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = GroqClient::new("test-key", GroqClient::DEFAULT_MODEL);
        assert_eq!(client.model(), "llama-3.3-70b-versatile");
        assert_eq!(client.provider(), "groq");
    }

    #[test]
    fn test_response_text() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"[2, 5]"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.into_text().unwrap(), "[2, 5]");
    }

    #[test]
    fn test_no_choices_is_empty_response() {
        let parsed: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(parsed.into_text(), Err(LlmError::EmptyResponse)));
    }
}
