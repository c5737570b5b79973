//! Endpoints called by API key holders rather than the dashboard owner

pub mod check_api_key;
pub mod github_summarizer;

use axum::{routing::post, Router};

use super::state::AppState;

/// Create the public router, mounted under `/api`
pub fn create_public_router() -> Router<AppState> {
    Router::new()
        .route("/check-api-key", post(check_api_key::check_api_key))
        .route("/github-summarizer", post(github_summarizer::summarize_repository))
}
