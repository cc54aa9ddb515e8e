use axum::{Json, http::StatusCode};
use serde::{Deserialize, Serialize};
use shopai_core::Product;
use shopai_rank::{RankingSource, Recommendation};

use super::request::{MISSING_INPUT, RequestError};

/// JSON error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<Self>) {
        (
            status,
            Json(Self {
                error: message.into(),
            }),
        )
    }

    pub fn bad_request(message: impl Into<String>) -> (StatusCode, Json<Self>) {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl From<RequestError> for (StatusCode, Json<ApiError>) {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::MissingInput => ApiError::bad_request(MISSING_INPUT),
            RequestError::InvalidProduct(detail) => {
                ApiError::bad_request(format!("Invalid products: {}", detail))
            }
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub recommendations: Vec<Product>,
    pub reasoning: String,
    pub source: RankingSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

impl From<Recommendation> for RecommendResponse {
    fn from(rec: Recommendation) -> Self {
        Self {
            recommendations: rec.products,
            reasoning: rec.reasoning,
            source: rec.source,
            provider: rec.provider,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// Active LLM provider, None when ranking is local-only
    pub llm_provider: Option<String>,
    /// Model the provider is asked for
    #[serde(default)]
    pub llm_model: Option<String>,
}
