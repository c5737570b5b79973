//! Request and response types for the HTTP API

pub mod api_key;
pub mod error;
pub mod json;
pub mod summarizer;

pub use api_key::{
    ApiKeyResponse, CheckApiKeyRequest, CheckApiKeyResponse, CreateApiKeyBody,
    CreatedApiKeyResponse, DeleteApiKeyResponse, ListApiKeysResponse, UpdateApiKeyBody,
};
pub use error::{ApiError, ApiErrorResponse, ApiErrorType};
pub use json::Json;
pub use summarizer::{SummarizeRequest, SummarizeResponse};
