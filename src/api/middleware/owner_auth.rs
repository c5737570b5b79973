//! Dashboard owner authentication using JWT tokens

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::api_key::OwnerId;

/// Extractor that requires a valid owner JWT
///
/// The token is read from `Authorization: Bearer <jwt>` and its `sub`
/// claim becomes the owner every key operation is scoped to.
#[derive(Debug, Clone)]
pub struct RequireOwner(pub OwnerId);

impl FromRequestParts<AppState> for RequireOwner {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_jwt_token(&parts.headers)?;

        let claims = state.jwt_service.validate(&token).map_err(|e| {
            debug!(error = %e, "Rejected owner token");
            ApiError::unauthorized("Invalid or expired token")
        })?;

        let owner = claims
            .owner_id()
            .map_err(|_| ApiError::unauthorized("Token does not identify an owner"))?;

        Ok(RequireOwner(owner))
    }
}

/// Extract JWT token from Authorization header
pub fn extract_jwt_token(headers: &HeaderMap) -> Result<String, ApiError> {
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| ApiError::unauthorized("Invalid Authorization header encoding"))?;

        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            let token = token.trim();
            if !token.is_empty() {
                return Ok(token.to_string());
            }
        }
    }

    Err(ApiError::unauthorized(
        "Authentication required. Provide JWT token via 'Authorization: Bearer <token>' header",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_extract_jwt_token() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer eyJ.abc.def".parse().unwrap());

        assert_eq!(extract_jwt_token(&headers).unwrap(), "eyJ.abc.def");
    }

    #[test]
    fn test_missing_or_empty_token() {
        let err = extract_jwt_token(&HeaderMap::new()).unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer   ".parse().unwrap());
        assert!(extract_jwt_token(&headers).is_err());
    }
}
