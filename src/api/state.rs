//! Application state for shared services

use std::sync::Arc;

use crate::domain::api_key::{ApiKey, ApiKeyId, ApiKeyRepository, OwnerId, UsageSummary};
use crate::domain::summarizer::{GithubRepository, RepositorySummary};
use crate::domain::DomainError;
use crate::infrastructure::api_key::{
    ApiKeyService, CreateApiKeyRequest, CreateApiKeyResult, UpdateApiKeyRequest,
};
use crate::infrastructure::auth::JwtGenerator;
use crate::infrastructure::summarizer::SummarizerService;

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub api_key_service: Arc<dyn ApiKeyServiceTrait>,
    pub jwt_service: Arc<dyn JwtGenerator>,
    /// Absent when no LLM credentials are configured
    pub summarizer: Option<Arc<dyn SummarizerServiceTrait>>,
}

impl AppState {
    pub fn new(
        api_key_service: Arc<dyn ApiKeyServiceTrait>,
        jwt_service: Arc<dyn JwtGenerator>,
    ) -> Self {
        Self {
            api_key_service,
            jwt_service,
            summarizer: None,
        }
    }

    pub fn with_summarizer(mut self, summarizer: Arc<dyn SummarizerServiceTrait>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }
}

/// Trait for API key service operations
#[async_trait::async_trait]
pub trait ApiKeyServiceTrait: Send + Sync {
    async fn create(
        &self,
        owner: &OwnerId,
        request: CreateApiKeyRequest,
    ) -> Result<CreateApiKeyResult, DomainError>;
    async fn exists(&self, token: &str) -> Result<bool, DomainError>;
    async fn authenticate(&self, token: &str) -> Result<ApiKey, DomainError>;
    async fn consume_quota(&self, api_key: &ApiKey) -> Result<(), DomainError>;
    async fn get(&self, owner: &OwnerId, id: &ApiKeyId) -> Result<ApiKey, DomainError>;
    async fn update(
        &self,
        owner: &OwnerId,
        id: &ApiKeyId,
        request: UpdateApiKeyRequest,
    ) -> Result<ApiKey, DomainError>;
    async fn delete(&self, owner: &OwnerId, id: &ApiKeyId) -> Result<(), DomainError>;
    async fn list(&self, owner: &OwnerId) -> Result<Vec<ApiKey>, DomainError>;
    async fn usage_summary(&self, owner: &OwnerId) -> Result<UsageSummary, DomainError>;
    async fn health_check(&self) -> Result<(), DomainError>;
}

/// Trait for README summarization
#[async_trait::async_trait]
pub trait SummarizerServiceTrait: Send + Sync {
    async fn summarize(
        &self,
        repository: GithubRepository,
    ) -> Result<RepositorySummary, DomainError>;
}

#[async_trait::async_trait]
impl<R: ApiKeyRepository + 'static> ApiKeyServiceTrait for ApiKeyService<R> {
    async fn create(
        &self,
        owner: &OwnerId,
        request: CreateApiKeyRequest,
    ) -> Result<CreateApiKeyResult, DomainError> {
        ApiKeyService::create(self, owner, request).await
    }

    async fn exists(&self, token: &str) -> Result<bool, DomainError> {
        ApiKeyService::exists(self, token).await
    }

    async fn authenticate(&self, token: &str) -> Result<ApiKey, DomainError> {
        ApiKeyService::authenticate(self, token).await
    }

    async fn consume_quota(&self, api_key: &ApiKey) -> Result<(), DomainError> {
        ApiKeyService::consume_quota(self, api_key).await
    }

    async fn get(&self, owner: &OwnerId, id: &ApiKeyId) -> Result<ApiKey, DomainError> {
        ApiKeyService::get(self, owner, id).await
    }

    async fn update(
        &self,
        owner: &OwnerId,
        id: &ApiKeyId,
        request: UpdateApiKeyRequest,
    ) -> Result<ApiKey, DomainError> {
        ApiKeyService::update(self, owner, id, request).await
    }

    async fn delete(&self, owner: &OwnerId, id: &ApiKeyId) -> Result<(), DomainError> {
        ApiKeyService::delete(self, owner, id).await
    }

    async fn list(&self, owner: &OwnerId) -> Result<Vec<ApiKey>, DomainError> {
        ApiKeyService::list(self, owner).await
    }

    async fn usage_summary(&self, owner: &OwnerId) -> Result<UsageSummary, DomainError> {
        ApiKeyService::usage_summary(self, owner).await
    }

    async fn health_check(&self) -> Result<(), DomainError> {
        ApiKeyService::health_check(self).await
    }
}

#[async_trait::async_trait]
impl SummarizerServiceTrait for SummarizerService {
    async fn summarize(
        &self,
        repository: GithubRepository,
    ) -> Result<RepositorySummary, DomainError> {
        SummarizerService::summarize(self, repository).await
    }
}
