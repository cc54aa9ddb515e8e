use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::models::{ApiError, MISSING_INPUT, RecommendRequest, RecommendResponse};
use crate::state::AppState;

// Handler: POST /api/recommend
// Validation failures are 400s; LLM trouble never is, the engine falls back on its own.
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<RecommendResponse>, (StatusCode, Json<ApiError>)> {
    let start = Instant::now();

    let Json(body) = payload.map_err(|e| {
        warn!(error = %e, "Unreadable recommend body");
        ApiError::bad_request(MISSING_INPUT)
    })?;
    let request = RecommendRequest::from_json(body)?;

    info!(query = %request.query, catalog_size = request.products.len(), "Recommend request");

    let recommendation = state
        .recommender
        .recommend(&request.query, &request.products)
        .await;

    let elapsed = start.elapsed().as_millis();
    info!(
        results = recommendation.products.len(),
        source = ?recommendation.source,
        time_ms = elapsed,
        "Recommend complete"
    );

    Ok(Json(RecommendResponse::from(recommendation)))
}
