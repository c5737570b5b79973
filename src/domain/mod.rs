//! Domain layer - Core business logic and entities

pub mod api_key;
pub mod error;
pub mod llm;
pub mod summarizer;

pub use api_key::{
    ApiKey, ApiKeyId, ApiKeyPatch, ApiKeyRepository, ApiKeyValidationError, KeyType, OwnerId,
    UsageSummary,
};
pub use error::DomainError;
pub use llm::{ChatCompletion, ChatPrompt, LlmProvider};
pub use summarizer::{GithubRepository, ReadmeSource, ReadmeSummary, RepositorySummary};
