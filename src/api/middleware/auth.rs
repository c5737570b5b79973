//! API key authentication middleware

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::api_key::ApiKey;
use crate::infrastructure::api_key::log_prefix;

/// Header carrying the caller's API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Extractor that requires a valid API key
///
/// Extracts the API key from either:
/// - X-API-Key header: `<api_key>`
/// - Authorization header: `Bearer <api_key>`
///
/// The value is compared exactly as sent.
#[derive(Debug, Clone)]
pub struct RequireApiKey(pub ApiKey);

impl FromRequestParts<AppState> for RequireApiKey {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_api_key_from_headers(&parts.headers)?;

        debug!(key_prefix = %log_prefix(&token), "Authenticating API key");

        let api_key = state.api_key_service.authenticate(&token).await?;

        Ok(RequireApiKey(api_key))
    }
}

fn extract_api_key_from_headers(headers: &HeaderMap) -> Result<String, ApiError> {
    if let Some(api_key_header) = headers.get(API_KEY_HEADER) {
        let key = api_key_header
            .to_str()
            .map_err(|_| ApiError::unauthorized("Invalid API key"))?;

        if !key.is_empty() {
            return Ok(key.to_string());
        }
    }

    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| ApiError::unauthorized("Invalid API key"))?;

        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            if !token.is_empty() {
                return Ok(token.to_string());
            }
        }
    }

    Err(ApiError::unauthorized(
        "API key required. Provide via 'X-API-Key: <key>' or 'Authorization: Bearer <key>' header",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_extract_x_api_key() {
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, "0123456789abcdef".parse().unwrap());

        assert_eq!(
            extract_api_key_from_headers(&headers).unwrap(),
            "0123456789abcdef"
        );
    }

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer 0123456789abcdef".parse().unwrap());

        assert_eq!(
            extract_api_key_from_headers(&headers).unwrap(),
            "0123456789abcdef"
        );
    }

    #[test]
    fn test_x_api_key_takes_precedence() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer from-bearer".parse().unwrap());
        headers.insert(API_KEY_HEADER, "from-header".parse().unwrap());

        assert_eq!(extract_api_key_from_headers(&headers).unwrap(), "from-header");
    }

    #[test]
    fn test_missing_api_key() {
        let err = extract_api_key_from_headers(&HeaderMap::new()).unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_invalid_bearer_format() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Basic dXNlcjpwYXNz".parse().unwrap());

        assert!(extract_api_key_from_headers(&headers).is_err());
    }

    #[test]
    fn test_value_is_not_trimmed() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer  abc".parse().unwrap());

        assert_eq!(extract_api_key_from_headers(&headers).unwrap(), " abc");
    }
}
