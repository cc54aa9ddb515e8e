// Ollama Local LLM client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::llm_client::{post_json, LlmClient, LlmError, SYSTEM_PROMPT};

#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    system: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaClient {
    pub const DEFAULT_URL: &'static str = "http://localhost:11434";
    pub const DEFAULT_MODEL: &'static str = "llama3.2:3b";

    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn generate(&self, prompt: &str, model: Option<&str>) -> Result<String, LlmError> {
        let request = GenerateRequest {
            model: model.unwrap_or(&self.model),
            system: SYSTEM_PROMPT,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: 0.2,
                num_predict: 256,
            },
        };

        let result: GenerateResponse = post_json(self.client.post(self.endpoint()), &request).await?;
        Ok(result.response)
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn provider(&self) -> &str {
        "ollama"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = OllamaClient::new("http://localhost:11434", "llama3.2:3b");
        assert_eq!(client.model(), "llama3.2:3b");
        assert_eq!(client.provider(), "ollama");

        let client = OllamaClient::new("http://gpu-box:11434/", "llama3.2:3b");
        assert_eq!(client.endpoint(), "http://gpu-box:11434/api/generate");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_error() {
        // port 9 (discard) is never an Ollama server
        let client = OllamaClient::new("http://127.0.0.1:9", "llama3.2:3b");
        let result = client.generate("hello", None).await;
        assert!(result.is_err());
    }
}
