//! Key existence check

use axum::extract::State;

use crate::api::state::AppState;
use crate::api::types::{ApiError, CheckApiKeyRequest, CheckApiKeyResponse, Json};

/// POST /api/check-api-key
///
/// Answers whether the presented token belongs to any key. Unauthenticated;
/// the token is compared exactly and no usage is recorded.
pub async fn check_api_key(
    State(state): State<AppState>,
    Json(body): Json<CheckApiKeyRequest>,
) -> Result<Json<CheckApiKeyResponse>, ApiError> {
    let token = body
        .api_key
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::bad_request("API key is required"))?;

    let found = state.api_key_service.exists(&token).await?;

    Ok(Json(CheckApiKeyResponse { found }))
}
