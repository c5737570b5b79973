//! API Key infrastructure implementations
//!
//! Token generation, the key service, and the in-memory and PostgreSQL
//! key stores.

mod generator;
mod in_memory;
mod postgres;
mod service;

pub use generator::{
    hash_token, log_prefix, ApiKeyGenerator, GeneratedApiKey, DEFAULT_TOKEN_BYTES,
};
pub use in_memory::InMemoryApiKeyRepository;
pub use postgres::PostgresApiKeyRepository;
pub use service::{
    parse_api_key_id, ApiKeyService, CreateApiKeyRequest, CreateApiKeyResult,
    UpdateApiKeyRequest, DEFAULT_MAX_GENERATION_ATTEMPTS, DEFAULT_USAGE_LIMIT,
};
