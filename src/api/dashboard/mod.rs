//! Owner-facing key management endpoints

pub mod api_keys;

use axum::{routing::get, Router};

use super::state::AppState;

/// Create the dashboard router, mounted under `/api`
pub fn create_dashboard_router() -> Router<AppState> {
    Router::new()
        .route(
            "/api-keys",
            get(api_keys::list_api_keys).post(api_keys::create_api_key),
        )
        .route("/api-keys/usage", get(api_keys::get_usage))
        .route(
            "/api-keys/{key_id}",
            get(api_keys::get_api_key)
                .patch(api_keys::update_api_key)
                .put(api_keys::update_api_key)
                .delete(api_keys::delete_api_key),
        )
}
