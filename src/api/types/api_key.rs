//! API key request and response bodies

use serde::{Deserialize, Serialize};

use crate::domain::api_key::{ApiKey, KeyType, UsageSummary};
use crate::domain::DomainError;
use crate::infrastructure::api_key::{
    CreateApiKeyRequest, UpdateApiKeyRequest, DEFAULT_USAGE_LIMIT,
};

fn parse_key_type(value: &str) -> Result<KeyType, DomainError> {
    KeyType::parse(value).map_err(|e| DomainError::validation(e.to_string()))
}

/// Body of `POST /api/api-keys`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateApiKeyBody {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub key_type: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
}

impl CreateApiKeyBody {
    /// Apply defaults (`dev`, 1000) and resolve the key type
    pub fn into_request(self) -> Result<CreateApiKeyRequest, DomainError> {
        let key_type = match self.key_type.as_deref() {
            Some(value) => parse_key_type(value)?,
            None => KeyType::default(),
        };

        Ok(CreateApiKeyRequest {
            name: self.name,
            key_type,
            limit: self.limit.unwrap_or(DEFAULT_USAGE_LIMIT),
        })
    }
}

/// Body of `PATCH`/`PUT /api/api-keys/{id}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateApiKeyBody {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub key_type: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
}

impl UpdateApiKeyBody {
    pub fn into_request(self) -> Result<UpdateApiKeyRequest, DomainError> {
        Ok(UpdateApiKeyRequest {
            name: self.name,
            key_type: self.key_type.as_deref().map(parse_key_type).transpose()?,
            limit: self.limit,
        })
    }
}

/// Key record as shown on the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeyResponse {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub key_type: KeyType,
    pub masked_key: String,
    pub usage: u64,
    pub limit: u64,
    pub usage_percent: f64,
    pub created_by: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&ApiKey> for ApiKeyResponse {
    fn from(key: &ApiKey) -> Self {
        Self {
            id: key.id().to_string(),
            name: key.name().to_string(),
            key_type: key.key_type(),
            masked_key: key.masked_key(),
            usage: key.usage(),
            limit: key.limit(),
            usage_percent: key.usage_percent(),
            created_by: key.created_by().to_string(),
            created_at: key.created_at().to_rfc3339(),
            updated_at: key.updated_at().to_rfc3339(),
        }
    }
}

/// Key record with the plaintext token (only on creation)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedApiKeyResponse {
    #[serde(flatten)]
    pub record: ApiKeyResponse,
    pub api_key: String,
}

/// Body of `GET /api/api-keys`
#[derive(Debug, Clone, Serialize)]
pub struct ListApiKeysResponse {
    pub api_keys: Vec<ApiKeyResponse>,
    pub total: usize,
    pub usage: UsageSummary,
}

impl ListApiKeysResponse {
    pub fn from_keys(keys: &[ApiKey]) -> Self {
        Self {
            api_keys: keys.iter().map(ApiKeyResponse::from).collect(),
            total: keys.len(),
            usage: UsageSummary::from_keys(keys),
        }
    }
}

/// Body of `DELETE /api/api-keys/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteApiKeyResponse {
    pub deleted: bool,
    pub id: String,
}

/// Body of `POST /api/check-api-key`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckApiKeyRequest {
    #[serde(rename = "apiKey", default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckApiKeyResponse {
    pub found: bool,
}
