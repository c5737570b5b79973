//! API Key entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::masking::masked_from_parts;
use super::usage::usage_percent;
use super::validation::{validate_owner, ApiKeyValidationError};

/// API Key identifier - a random UUID assigned at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiKeyId(Uuid);

impl ApiKeyId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from its string form
    pub fn parse(id: &str) -> Result<Self, ApiKeyValidationError> {
        Uuid::parse_str(id)
            .map(Self)
            .map_err(|_| ApiKeyValidationError::InvalidId(id.to_string()))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for ApiKeyId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ApiKeyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the principal owning a key (the `sub` of the owner's token)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OwnerId(String);

impl OwnerId {
    /// Create a new OwnerId after validation
    pub fn new(id: impl Into<String>) -> Result<Self, ApiKeyValidationError> {
        let id = id.into();
        validate_owner(&id)?;
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for OwnerId {
    type Error = ApiKeyValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OwnerId> for String {
    fn from(id: OwnerId) -> Self {
        id.0
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Environment a key is intended for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum KeyType {
    #[default]
    #[serde(rename = "dev", alias = "development")]
    Development,
    #[serde(rename = "prod", alias = "production")]
    Production,
}

impl KeyType {
    /// Short wire/storage form
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "dev",
            Self::Production => "prod",
        }
    }

    /// Parse either the short or the long form
    pub fn parse(value: &str) -> Result<Self, ApiKeyValidationError> {
        match value {
            "dev" | "development" => Ok(Self::Development),
            "prod" | "production" => Ok(Self::Production),
            other => Err(ApiKeyValidationError::InvalidType(other.to_string())),
        }
    }
}

impl std::fmt::Display for KeyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Partial update of the mutable fields of a key
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiKeyPatch {
    pub name: Option<String>,
    pub key_type: Option<KeyType>,
    pub limit: Option<u64>,
}

impl ApiKeyPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.key_type.is_none() && self.limit.is_none()
    }
}

/// Raw field values used to rebuild a key loaded from storage
#[derive(Debug, Clone)]
pub struct ApiKeyParts {
    pub id: ApiKeyId,
    pub name: String,
    pub key_hash: String,
    pub key_prefix: String,
    pub key_suffix: String,
    pub key_type: KeyType,
    pub usage: u64,
    pub limit: u64,
    pub created_by: OwnerId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// API key record
///
/// The plaintext token is never part of the record. Only its hash (for
/// lookups) and its first and last characters (for masked display) are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiKey {
    id: ApiKeyId,
    name: String,
    key_hash: String,
    key_prefix: String,
    key_suffix: String,
    key_type: KeyType,
    usage: u64,
    limit: u64,
    created_by: OwnerId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ApiKey {
    /// Create a new key record with zeroed usage
    pub fn new(
        created_by: OwnerId,
        name: impl Into<String>,
        key_type: KeyType,
        limit: u64,
        key_hash: impl Into<String>,
        key_prefix: impl Into<String>,
        key_suffix: impl Into<String>,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: ApiKeyId::generate(),
            name: name.into(),
            key_hash: key_hash.into(),
            key_prefix: key_prefix.into(),
            key_suffix: key_suffix.into(),
            key_type,
            usage: 0,
            limit,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a record from stored values
    pub fn from_parts(parts: ApiKeyParts) -> Self {
        Self {
            id: parts.id,
            name: parts.name,
            key_hash: parts.key_hash,
            key_prefix: parts.key_prefix,
            key_suffix: parts.key_suffix,
            key_type: parts.key_type,
            usage: parts.usage,
            limit: parts.limit,
            created_by: parts.created_by,
            created_at: parts.created_at,
            updated_at: parts.updated_at,
        }
    }

    pub fn id(&self) -> ApiKeyId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key_hash(&self) -> &str {
        &self.key_hash
    }

    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }

    pub fn key_suffix(&self) -> &str {
        &self.key_suffix
    }

    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    pub fn usage(&self) -> u64 {
        self.usage
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn created_by(&self) -> &OwnerId {
        &self.created_by
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Masked form of the token for display
    pub fn masked_key(&self) -> String {
        masked_from_parts(&self.key_prefix, &self.key_suffix)
    }

    /// Share of the monthly limit already consumed, in percent
    pub fn usage_percent(&self) -> f64 {
        usage_percent(self.usage, self.limit)
    }

    /// Whether the key has quota left for another request
    pub fn has_quota(&self) -> bool {
        self.usage < self.limit
    }

    pub fn is_owned_by(&self, owner: &OwnerId) -> bool {
        &self.created_by == owner
    }

    /// Apply a partial update; returns true if anything was set
    pub fn apply(&mut self, patch: &ApiKeyPatch) -> bool {
        if patch.is_empty() {
            return false;
        }

        if let Some(ref name) = patch.name {
            self.name = name.clone();
        }

        if let Some(key_type) = patch.key_type {
            self.key_type = key_type;
        }

        if let Some(limit) = patch.limit {
            self.limit = limit;
        }

        self.touch();
        true
    }

    /// Consume one unit of quota if available
    pub fn consume_quota(&mut self) -> bool {
        if !self.has_quota() {
            return false;
        }

        self.usage += 1;
        true
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
