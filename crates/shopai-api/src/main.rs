use shopai_api::config::ServerConfig;
use shopai_api::state::AppState;
use shopai_rank::{Recommender, RecommenderConfig};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    dotenvy::dotenv().ok();

    //logging setup
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::load()?;

    // Setup recommendation engine; no credential means local ranking only
    let recommender = Recommender::new(config.apply_to(RecommenderConfig::from_env()));
    match (recommender.provider_name(), recommender.model_name()) {
        (Some(provider), Some(model)) => info!(provider, model, "LLM ranking ENABLED"),
        _ => info!("LLM ranking DISABLED (set GEMINI_API_KEY to enable), using local scorer"),
    }

    if config.api_key.is_some() {
        info!("API key authentication ENABLED");
    } else {
        info!("API key authentication DISABLED (set SHOPAI_API_KEY to enable)");
    }

    let state = Arc::new(AppState::new(recommender, config.api_key.clone()));
    let app = shopai_api::app(state);

    // Server start
    info!("Starting server on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
