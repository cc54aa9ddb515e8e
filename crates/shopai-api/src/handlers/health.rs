use axum::{Json, extract::State};
use std::sync::Arc;

use crate::models::HealthResponse;
use crate::state::AppState;

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        llm_provider: state.recommender.provider_name().map(str::to_string),
        llm_model: state.recommender.model_name().map(str::to_string),
    })
}
