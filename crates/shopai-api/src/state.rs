use shopai_rank::Recommender;

// App state - shared across handlers, read-only after startup
pub struct AppState {
    pub recommender: Recommender,
    pub api_key: Option<String>,
}

impl AppState {
    pub fn new(recommender: Recommender, api_key: Option<String>) -> Self {
        Self {
            recommender,
            api_key: api_key.filter(|k| !k.is_empty()),
        }
    }
}
