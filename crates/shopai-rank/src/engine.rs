// Recommendation engine
// Orchestrates: LLM ranking (if configured) -> id parsing -> catalog filter, with local scoring as the fallback

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use shopai_core::Product;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::gemini_client::GeminiClient;
use crate::groq_client::GroqClient;
use crate::llm_client::{LlmClient, LlmError};
use crate::ollama_client::OllamaClient;
use crate::prompt::{build_prompt, parse_product_ids, select_products};
use crate::scorer::LocalScorer;

/// Why the LLM path was abandoned. Never surfaced to callers; every variant
/// ends in the local scorer.
#[derive(Error, Debug)]
pub enum RankError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("LLM timed out after {0:?}")]
    Timeout(Duration),

    #[error("Failed to build prompt: {0}")]
    Prompt(#[from] serde_json::Error),

    #[error("LLM response named no catalog products")]
    NoMatches,
}

/// LLM Provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    Gemini,
    Groq,
    Ollama,
}

impl LlmProvider {
    /// Parse provider name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "gemini" | "google" => Some(Self::Gemini),
            "groq" => Some(Self::Groq),
            "ollama" => Some(Self::Ollama),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Groq => "groq",
            Self::Ollama => "ollama",
        }
    }
}

// LLM connection settings
#[derive(Debug, Clone, PartialEq)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub api_key: Option<String>,
    /// Overrides the provider's default model when set
    pub model: Option<String>,
    pub base_url: Option<String>,
}

// Engine configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RecommenderConfig {
    /// None means local-only ranking
    pub llm: Option<LlmConfig>,
    pub llm_timeout: Duration,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            llm: None,
            llm_timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl RecommenderConfig {
    pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

    pub fn local_only() -> Self {
        Self::default()
    }

    pub fn with_gemini(api_key: impl Into<String>) -> Self {
        Self::with_llm(LlmProvider::Gemini, Some(api_key.into()), None)
    }

    pub fn with_groq(api_key: impl Into<String>) -> Self {
        Self::with_llm(LlmProvider::Groq, Some(api_key.into()), None)
    }

    pub fn with_ollama(base_url: impl Into<String>) -> Self {
        Self::with_llm(LlmProvider::Ollama, None, Some(base_url.into()))
    }

    fn with_llm(provider: LlmProvider, api_key: Option<String>, base_url: Option<String>) -> Self {
        Self {
            llm: Some(LlmConfig {
                provider,
                api_key,
                model: None,
                base_url,
            }),
            ..Default::default()
        }
    }

    /// Read configuration from the process environment.
    /// - SHOPAI_LLM_PROVIDER: gemini (default) | groq | ollama
    /// - GEMINI_API_KEY / GROQ_API_KEY: credential for the hosted providers
    /// - OLLAMA_URL: Ollama base URL (default: http://localhost:11434)
    /// - SHOPAI_LLM_MODEL: model override
    /// - SHOPAI_LLM_TIMEOUT_SECS: LLM timeout (default: 10)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` with an arbitrary variable source.
    /// A missing credential selects local-only ranking; it is never an error.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let llm_timeout = get("SHOPAI_LLM_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS));

        let provider = match get("SHOPAI_LLM_PROVIDER") {
            None => Some(LlmProvider::default()),
            Some(name) => {
                let parsed = LlmProvider::from_name(&name);
                if parsed.is_none() {
                    warn!(provider = %name, "Unknown LLM provider, using local ranking only");
                }
                parsed
            }
        };

        let llm = provider.and_then(|provider| {
            let (api_key, base_url) = match provider {
                LlmProvider::Gemini => (Some(get("GEMINI_API_KEY")?), None),
                LlmProvider::Groq => (Some(get("GROQ_API_KEY")?), None),
                LlmProvider::Ollama => (None, get("OLLAMA_URL")),
            };
            Some(LlmConfig {
                provider,
                api_key,
                model: get("SHOPAI_LLM_MODEL"),
                base_url,
            })
        });

        Self { llm, llm_timeout }
    }
}

/// Where a recommendation list came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankingSource {
    /// LLM ranking succeeded
    Llm,
    /// No LLM configured
    Local,
    /// LLM configured but failed; local scorer output
    Fallback,
}

// Recommendation result with products and a human-readable note
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub products: Vec<Product>,
    pub source: RankingSource,
    pub provider: Option<String>,
    pub reasoning: String,
}

// main recommendation engine
pub struct Recommender {
    client: Option<Arc<dyn LlmClient>>,
    model: Option<String>,
    llm_timeout: Duration,
    scorer: LocalScorer,
}

impl Recommender {
    pub fn new(config: RecommenderConfig) -> Self {
        let model = config.llm.as_ref().and_then(|llm| llm.model.clone());
        let client = config.llm.as_ref().and_then(|llm| match build_client(llm) {
            Ok(client) => Some(client),
            Err(e) => {
                info!(provider = llm.provider.as_str(), reason = %e, "LLM disabled, using local ranking only");
                None
            }
        });

        Self {
            client,
            model,
            llm_timeout: config.llm_timeout,
            scorer: LocalScorer::new(),
        }
    }

    /// Engine around an existing client (custom providers, tests)
    pub fn with_client(client: Arc<dyn LlmClient>) -> Self {
        Self {
            client: Some(client),
            model: None,
            llm_timeout: Duration::from_secs(RecommenderConfig::DEFAULT_TIMEOUT_SECS),
            scorer: LocalScorer::new(),
        }
    }

    pub fn local_only() -> Self {
        Self::new(RecommenderConfig::local_only())
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.llm_timeout = timeout;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn llm_enabled(&self) -> bool {
        self.client.is_some()
    }

    /// Active provider name, if any
    pub fn provider_name(&self) -> Option<&str> {
        self.client.as_ref().map(|c| c.provider())
    }

    /// Model sent to the provider: the override if set, else the client default
    pub fn model_name(&self) -> Option<&str> {
        let client = self.client.as_ref()?;
        Some(self.model.as_deref().unwrap_or(client.model()))
    }

    /// Rank `catalog` for `query`. Never fails: every LLM problem degrades to
    /// the local scorer, whose empty result is a valid answer.
    ///
    /// Inputs are expected to be validated by the caller (non-empty query,
    /// a list of products). Dropping the returned future abandons any
    /// in-flight LLM request; nothing outlives the call.
    pub async fn recommend(&self, query: &str, catalog: &[Product]) -> Recommendation {
        let Some(client) = self.client.as_ref() else {
            debug!("No LLM configured, ranking locally");
            return self.local(query, catalog, RankingSource::Local);
        };

        if catalog.is_empty() {
            return self.local(query, catalog, RankingSource::Local);
        }

        let model = self.model.as_deref().unwrap_or(client.model());
        match self.rank_with_llm(client.as_ref(), query, catalog).await {
            Ok(products) => {
                info!(
                    provider = client.provider(),
                    model,
                    matched = products.len(),
                    catalog_size = catalog.len(),
                    "LLM ranking complete"
                );
                Recommendation {
                    reasoning: format!(
                        "AI found {} products matching your criteria.",
                        products.len()
                    ),
                    products,
                    source: RankingSource::Llm,
                    provider: Some(client.provider().to_string()),
                }
            }
            Err(e) => {
                warn!(provider = client.provider(), model, error = %e, "LLM ranking failed, falling back to local scorer");
                self.local(query, catalog, RankingSource::Fallback)
            }
        }
    }

    /// Local scorer only, regardless of configuration
    pub fn recommend_local(&self, query: &str, catalog: &[Product]) -> Vec<Product> {
        self.scorer.recommend(query, catalog)
    }

    async fn rank_with_llm(
        &self,
        client: &dyn LlmClient,
        query: &str,
        catalog: &[Product],
    ) -> Result<Vec<Product>, RankError> {
        let prompt = build_prompt(query, catalog)?;

        let response = tokio::time::timeout(
            self.llm_timeout,
            client.generate(&prompt, self.model.as_deref()),
        )
        .await
        .map_err(|_| RankError::Timeout(self.llm_timeout))??;

        let ids = parse_product_ids(&response);
        debug!(ids = ?ids, "Parsed product ids from LLM response");

        let products = select_products(catalog, &ids);
        if products.is_empty() {
            return Err(RankError::NoMatches);
        }
        Ok(products)
    }

    fn local(&self, query: &str, catalog: &[Product], source: RankingSource) -> Recommendation {
        let products = self.scorer.recommend(query, catalog);
        debug!(results = products.len(), ?source, "Local ranking complete");
        Recommendation {
            reasoning: format!(
                "Found {} products matching your criteria using smart filtering.",
                products.len()
            ),
            products,
            source,
            provider: None,
        }
    }
}

/// Build the concrete client for a provider; hosted providers need a key
fn build_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    let client: Arc<dyn LlmClient> = match config.provider {
        LlmProvider::Gemini => {
            let api_key = config.api_key.clone().ok_or(LlmError::MissingApiKey)?;
            let client = GeminiClient::new(api_key, GeminiClient::DEFAULT_MODEL);
            let client = match &config.base_url {
                Some(url) => client.with_base_url(url),
                None => client,
            };
            Arc::new(client)
        }
        LlmProvider::Groq => {
            let api_key = config.api_key.clone().ok_or(LlmError::MissingApiKey)?;
            Arc::new(GroqClient::new(api_key, GroqClient::DEFAULT_MODEL))
        }
        LlmProvider::Ollama => {
            let base_url = config
                .base_url
                .clone()
                .unwrap_or_else(|| OllamaClient::DEFAULT_URL.to_string());
            Arc::new(OllamaClient::new(base_url, OllamaClient::DEFAULT_MODEL))
        }
    };
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_no_credential_is_local_only() {
        let config = RecommenderConfig::from_lookup(lookup(&[]));
        assert!(config.llm.is_none());
        assert_eq!(config.llm_timeout, Duration::from_secs(10));
        let engine = Recommender::new(config);
        assert!(!engine.llm_enabled());
        assert!(engine.model_name().is_none());
    }

    #[test]
    fn test_empty_key_counts_as_absent() {
        let config = RecommenderConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "  ")]));
        assert!(config.llm.is_none());
    }

    #[test]
    fn test_gemini_from_env() {
        let config = RecommenderConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "g-key"),
            ("SHOPAI_LLM_MODEL", "gemini-1.5-pro"),
            ("SHOPAI_LLM_TIMEOUT_SECS", "3"),
        ]));
        let llm = config.llm.clone().unwrap();
        assert_eq!(llm.provider, LlmProvider::Gemini);
        assert_eq!(llm.api_key.as_deref(), Some("g-key"));
        assert_eq!(llm.model.as_deref(), Some("gemini-1.5-pro"));
        assert_eq!(config.llm_timeout, Duration::from_secs(3));

        let engine = Recommender::new(config);
        assert_eq!(engine.provider_name(), Some("gemini"));
        assert_eq!(engine.model_name(), Some("gemini-1.5-pro"));
    }

    #[test]
    fn test_groq_needs_its_own_key() {
        let config = RecommenderConfig::from_lookup(lookup(&[
            ("SHOPAI_LLM_PROVIDER", "groq"),
            ("GEMINI_API_KEY", "g-key"),
        ]));
        assert!(config.llm.is_none());

        let config = RecommenderConfig::from_lookup(lookup(&[
            ("SHOPAI_LLM_PROVIDER", "Groq"),
            ("GROQ_API_KEY", "q-key"),
        ]));
        assert_eq!(config.llm.unwrap().provider, LlmProvider::Groq);
    }

    #[test]
    fn test_ollama_needs_no_key() {
        let config = RecommenderConfig::from_lookup(lookup(&[("SHOPAI_LLM_PROVIDER", "ollama")]));
        let llm = config.llm.clone().unwrap();
        assert_eq!(llm.provider, LlmProvider::Ollama);
        assert!(llm.base_url.is_none());
        let engine = Recommender::new(config);
        assert_eq!(engine.provider_name(), Some("ollama"));
        assert_eq!(engine.model_name(), Some(OllamaClient::DEFAULT_MODEL));
    }

    #[test]
    fn test_unknown_provider_is_local_only() {
        let config = RecommenderConfig::from_lookup(lookup(&[
            ("SHOPAI_LLM_PROVIDER", "clippy"),
            ("GEMINI_API_KEY", "g-key"),
        ]));
        assert!(config.llm.is_none());
    }

    #[test]
    fn test_bad_timeout_uses_default() {
        let config =
            RecommenderConfig::from_lookup(lookup(&[("SHOPAI_LLM_TIMEOUT_SECS", "soon")]));
        assert_eq!(config.llm_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_missing_key_in_explicit_config_disables_llm() {
        let config = RecommenderConfig {
            llm: Some(LlmConfig {
                provider: LlmProvider::Gemini,
                api_key: None,
                model: None,
                base_url: None,
            }),
            ..Default::default()
        };
        assert!(!Recommender::new(config).llm_enabled());
    }

    #[tokio::test]
    async fn test_local_only_reports_local_source() {
        let engine = Recommender::local_only();
        let catalog = vec![Product::new(1, "Pixel 7", 449.0)];
        let result = engine.recommend("pixel", &catalog).await;
        assert_eq!(result.source, RankingSource::Local);
        assert!(result.provider.is_none());
        assert_eq!(result.products.len(), 1);
        assert_eq!(
            result.reasoning,
            "Found 1 products matching your criteria using smart filtering."
        );
    }
}
