//! API key management endpoints for the dashboard owner

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use tracing::debug;

use crate::api::middleware::RequireOwner;
use crate::api::state::AppState;
use crate::api::types::{
    ApiError, ApiKeyResponse, CreateApiKeyBody, CreatedApiKeyResponse, DeleteApiKeyResponse,
    Json, ListApiKeysResponse, UpdateApiKeyBody,
};
use crate::domain::api_key::UsageSummary;
use crate::infrastructure::api_key::parse_api_key_id;

/// GET /api/api-keys
pub async fn list_api_keys(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
) -> Result<Json<ListApiKeysResponse>, ApiError> {
    debug!(owner = %owner, "Listing API keys");

    let keys = state.api_key_service.list(&owner).await?;

    Ok(Json(ListApiKeysResponse::from_keys(&keys)))
}

/// POST /api/api-keys
pub async fn create_api_key(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Json(body): Json<CreateApiKeyBody>,
) -> Result<(StatusCode, Json<CreatedApiKeyResponse>), ApiError> {
    debug!(owner = %owner, name = %body.name, "Creating API key");

    let request = body.into_request()?;
    let created = state.api_key_service.create(&owner, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedApiKeyResponse {
            record: ApiKeyResponse::from(&created.api_key),
            api_key: created.token,
        }),
    ))
}

/// GET /api/api-keys/usage
pub async fn get_usage(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
) -> Result<Json<UsageSummary>, ApiError> {
    let summary = state.api_key_service.usage_summary(&owner).await?;
    Ok(Json(summary))
}

/// GET /api/api-keys/{key_id}
pub async fn get_api_key(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Path(key_id): Path<String>,
) -> Result<Json<ApiKeyResponse>, ApiError> {
    let id = parse_api_key_id(&key_id)?;
    let key = state.api_key_service.get(&owner, &id).await?;

    Ok(Json(ApiKeyResponse::from(&key)))
}

/// PATCH or PUT /api/api-keys/{key_id}
pub async fn update_api_key(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Path(key_id): Path<String>,
    Json(body): Json<UpdateApiKeyBody>,
) -> Result<Json<ApiKeyResponse>, ApiError> {
    debug!(owner = %owner, key_id = %key_id, "Updating API key");

    let id = parse_api_key_id(&key_id)?;
    let request = body.into_request()?;
    let key = state.api_key_service.update(&owner, &id, request).await?;

    Ok(Json(ApiKeyResponse::from(&key)))
}

/// DELETE /api/api-keys/{key_id}
pub async fn delete_api_key(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Path(key_id): Path<String>,
) -> Result<Json<DeleteApiKeyResponse>, ApiError> {
    debug!(owner = %owner, key_id = %key_id, "Deleting API key");

    let id = parse_api_key_id(&key_id)?;
    state.api_key_service.delete(&owner, &id).await?;

    Ok(Json(DeleteApiKeyResponse {
        deleted: true,
        id: id.to_string(),
    }))
}
