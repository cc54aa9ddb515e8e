// ShopAI API - HTTP surface for product recommendations

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod state;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::state::AppState;

/// Build the router: /health is open, /api/* sits behind the API key check.
/// The check is a route layer, so wrong methods get 405 before any 401.
pub fn app(state: Arc<AppState>) -> Router {
    let protected_routes = Router::new()
        .route("/api/recommend", post(handlers::recommend))
        .route_layer(from_fn_with_state(state.clone(), middleware::require_api_key));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
