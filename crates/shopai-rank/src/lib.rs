// ShopAI ranking - LLM product ranking with a deterministic local fallback

pub mod query_analyzer;
pub mod scorer;
pub mod llm_client;
pub mod gemini_client;
pub mod groq_client;
pub mod ollama_client;
pub mod prompt;
pub mod engine;

pub use query_analyzer::{AnalyzedQuery, QueryAnalyzer};
pub use scorer::{local_recommend, LocalScorer, ScoredProduct, MAX_RESULTS};
pub use llm_client::{LlmClient, LlmError};
pub use gemini_client::GeminiClient;
pub use groq_client::GroqClient;
pub use ollama_client::OllamaClient;
pub use engine::{
    LlmConfig, LlmProvider, RankError, RankingSource, Recommendation, Recommender,
    RecommenderConfig,
};
