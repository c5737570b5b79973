//! API Key service
//!
//! Issuance, validation, owner-scoped administration and usage accounting.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::api_key::{
    validate_limit, validate_name, ApiKey, ApiKeyId, ApiKeyPatch, ApiKeyRepository, KeyType,
    OwnerId, UsageSummary,
};
use crate::domain::DomainError;
use crate::infrastructure::observability::{record_api_key_event, ApiKeyEvent};

use super::generator::{hash_token, log_prefix, ApiKeyGenerator};

/// Default number of attempts when a generated token collides
pub const DEFAULT_MAX_GENERATION_ATTEMPTS: u32 = 3;

/// Default monthly limit for new keys
pub const DEFAULT_USAGE_LIMIT: i64 = 1000;

const NOT_FOUND_MESSAGE: &str = "API key not found";

/// Request for creating a new API key
#[derive(Debug, Clone)]
pub struct CreateApiKeyRequest {
    pub name: String,
    pub key_type: KeyType,
    pub limit: i64,
}

/// Request for updating an existing API key
#[derive(Debug, Clone, Default)]
pub struct UpdateApiKeyRequest {
    pub name: Option<String>,
    pub key_type: Option<KeyType>,
    pub limit: Option<i64>,
}

/// Result of creating a new API key
#[derive(Debug)]
pub struct CreateApiKeyResult {
    /// The stored record
    pub api_key: ApiKey,
    /// The plaintext token (only returned once)
    pub token: String,
}

/// Parse a path identifier into an ApiKeyId
pub fn parse_api_key_id(id: &str) -> Result<ApiKeyId, DomainError> {
    ApiKeyId::parse(id).map_err(|e| DomainError::invalid_id(e.to_string()))
}

/// API Key service for managing API keys
#[derive(Debug)]
pub struct ApiKeyService<R>
where
    R: ApiKeyRepository,
{
    repository: Arc<R>,
    generator: ApiKeyGenerator,
    max_generation_attempts: u32,
}

impl<R: ApiKeyRepository> ApiKeyService<R> {
    /// Create a new API key service
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            generator: ApiKeyGenerator::new(),
            max_generation_attempts: DEFAULT_MAX_GENERATION_ATTEMPTS,
        }
    }

    /// Create with a custom generator
    pub fn with_generator(mut self, generator: ApiKeyGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// Set how many times token generation is retried on collision
    pub fn with_max_generation_attempts(mut self, attempts: u32) -> Self {
        self.max_generation_attempts = attempts.max(1);
        self
    }

    /// Issue a new API key for an owner
    pub async fn create(
        &self,
        owner: &OwnerId,
        request: CreateApiKeyRequest,
    ) -> Result<CreateApiKeyResult, DomainError> {
        let name = validate_name(&request.name).map_err(|e| DomainError::validation(e.to_string()))?;
        let limit =
            validate_limit(request.limit).map_err(|e| DomainError::validation(e.to_string()))?;

        for attempt in 1..=self.max_generation_attempts {
            let generated = self.generator.generate();

            if generated.token.is_empty() {
                return Err(DomainError::internal("Generated an empty API key token"));
            }

            let api_key = ApiKey::new(
                owner.clone(),
                &name,
                request.key_type,
                limit,
                &generated.hash,
                &generated.prefix,
                &generated.suffix,
            );

            match self.repository.insert(api_key).await {
                Ok(created) => {
                    info!(
                        id = %created.id(),
                        owner = %owner,
                        key_type = %created.key_type(),
                        limit = created.limit(),
                        "API key created"
                    );
                    record_api_key_event(ApiKeyEvent::Issued);

                    return Ok(CreateApiKeyResult {
                        api_key: created,
                        token: generated.token,
                    });
                }
                Err(e) if e.is_conflict() => {
                    warn!(attempt, "Generated API key collided with an existing one, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(DomainError::internal(format!(
            "Could not generate a unique API key after {} attempts",
            self.max_generation_attempts
        )))
    }

    /// Whether a presented token belongs to any stored key
    ///
    /// The comparison is exact. Usage is not affected.
    pub async fn exists(&self, token: &str) -> Result<bool, DomainError> {
        if token.is_empty() {
            return Err(DomainError::validation("API key is required"));
        }

        let found = self.repository.find_by_hash(&hash_token(token)).await?.is_some();

        debug!(key_prefix = log_prefix(token), found, "API key existence checked");
        record_api_key_event(if found {
            ApiKeyEvent::ValidatedFound
        } else {
            ApiKeyEvent::ValidatedNotFound
        });

        Ok(found)
    }

    /// Resolve a presented token to its key, for gating endpoints
    pub async fn authenticate(&self, token: &str) -> Result<ApiKey, DomainError> {
        if token.is_empty() {
            return Err(DomainError::unauthenticated("API key is required"));
        }

        match self.repository.find_by_hash(&hash_token(token)).await? {
            Some(key) => Ok(key),
            None => {
                debug!(key_prefix = log_prefix(token), "Rejected unknown API key");
                Err(DomainError::unauthenticated("Invalid API key"))
            }
        }
    }

    /// Consume one unit of the key's quota
    pub async fn consume_quota(&self, api_key: &ApiKey) -> Result<(), DomainError> {
        if self.repository.consume_quota(&api_key.id()).await? {
            return Ok(());
        }

        info!(id = %api_key.id(), limit = api_key.limit(), "API key quota exhausted");
        record_api_key_event(ApiKeyEvent::QuotaRejected);

        Err(DomainError::quota_exceeded(format!(
            "API key usage limit of {} reached",
            api_key.limit()
        )))
    }

    /// Get an owner's API key
    pub async fn get(&self, owner: &OwnerId, id: &ApiKeyId) -> Result<ApiKey, DomainError> {
        self.repository
            .get(owner, id)
            .await?
            .ok_or_else(|| DomainError::not_found(NOT_FOUND_MESSAGE))
    }

    /// Update the mutable fields of an owner's API key
    pub async fn update(
        &self,
        owner: &OwnerId,
        id: &ApiKeyId,
        request: UpdateApiKeyRequest,
    ) -> Result<ApiKey, DomainError> {
        let patch = ApiKeyPatch {
            name: request
                .name
                .as_deref()
                .map(validate_name)
                .transpose()
                .map_err(|e| DomainError::validation(e.to_string()))?,
            key_type: request.key_type,
            limit: request
                .limit
                .map(validate_limit)
                .transpose()
                .map_err(|e| DomainError::validation(e.to_string()))?,
        };

        if patch.is_empty() {
            return Err(DomainError::validation(
                "At least one of name, type or limit must be provided",
            ));
        }

        let updated = self
            .repository
            .update(owner, id, &patch)
            .await?
            .ok_or_else(|| DomainError::not_found(NOT_FOUND_MESSAGE))?;

        info!(id = %id, owner = %owner, "API key updated");
        record_api_key_event(ApiKeyEvent::Updated);

        Ok(updated)
    }

    /// Delete an owner's API key
    pub async fn delete(&self, owner: &OwnerId, id: &ApiKeyId) -> Result<(), DomainError> {
        if !self.repository.delete(owner, id).await? {
            return Err(DomainError::not_found(NOT_FOUND_MESSAGE));
        }

        info!(id = %id, owner = %owner, "API key deleted");
        record_api_key_event(ApiKeyEvent::Deleted);

        Ok(())
    }

    /// List an owner's API keys, newest first
    pub async fn list(&self, owner: &OwnerId) -> Result<Vec<ApiKey>, DomainError> {
        self.repository.list(owner).await
    }

    /// Aggregate usage across an owner's keys
    pub async fn usage_summary(&self, owner: &OwnerId) -> Result<UsageSummary, DomainError> {
        let keys = self.repository.list(owner).await?;
        Ok(UsageSummary::from_keys(&keys))
    }

    /// Check the key store is reachable
    pub async fn health_check(&self) -> Result<(), DomainError> {
        self.repository.ping().await
    }
}
