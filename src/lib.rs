//! API Key Dashboard
//!
//! Backend for an API key management dashboard:
//! - Key issuance, masking and owner-scoped administration
//! - Public key validation
//! - Usage accounting against per-key monthly limits
//! - GitHub README summarization gated by API keys

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use api::state::{ApiKeyServiceTrait, AppState, SummarizerServiceTrait};
use config::{StorageBackend, SummarizerConfig};
use infrastructure::{
    api_key::{ApiKeyGenerator, ApiKeyService, InMemoryApiKeyRepository, PostgresApiKeyRepository},
    auth::{JwtConfig, JwtService},
    github::GithubReadmeClient,
    llm::{HttpClient, OpenAiProvider},
    storage::{connect_pool, run_migrations},
    summarizer::{SummarizerService, SummarizerSettings},
};
use rand::Rng;
use tracing::{info, warn};

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let api_key_service = create_api_key_service(config).await?;
    let jwt_service = Arc::new(create_jwt_service(config));

    let mut state = AppState::new(api_key_service, jwt_service);

    match create_summarizer(&config.summarizer)? {
        Some(summarizer) => state = state.with_summarizer(summarizer),
        None => warn!("No OpenAI API key configured; README summarization is disabled"),
    }

    Ok(state)
}

async fn create_api_key_service(config: &AppConfig) -> anyhow::Result<Arc<dyn ApiKeyServiceTrait>> {
    let generator = ApiKeyGenerator::new().with_token_bytes(config.api_keys.token_bytes);
    let attempts = config.api_keys.max_generation_attempts;

    info!("Storage backend: {:?}", config.storage.backend);

    let service: Arc<dyn ApiKeyServiceTrait> = match config.storage.backend {
        StorageBackend::Postgres => {
            let pg_config = config.database.postgres_config().ok_or_else(|| {
                anyhow::anyhow!(
                    "PostgreSQL storage requires database.url or the DATABASE_URL environment variable"
                )
            })?;

            info!("Connecting to PostgreSQL...");
            let pool = connect_pool(&pg_config).await?;

            if config.database.run_migrations {
                let applied = run_migrations(&pool).await?;
                info!(applied, "Database migrations complete");
            }

            Arc::new(
                ApiKeyService::new(Arc::new(PostgresApiKeyRepository::new(pool)))
                    .with_generator(generator)
                    .with_max_generation_attempts(attempts),
            )
        }
        StorageBackend::Memory => {
            info!("Using in-memory key store; keys are lost on restart");

            Arc::new(
                ApiKeyService::new(Arc::new(InMemoryApiKeyRepository::new()))
                    .with_generator(generator)
                    .with_max_generation_attempts(attempts),
            )
        }
    };

    Ok(service)
}

/// Build the owner token verifier
///
/// Without a configured secret an ephemeral one is generated, so only
/// tokens minted by this process are accepted.
pub fn create_jwt_service(config: &AppConfig) -> JwtService {
    let secret = match config.auth.jwt_secret.clone() {
        Some(secret) => secret,
        None => {
            warn!("No JWT secret configured; using an ephemeral secret for this process");
            generate_ephemeral_secret()
        }
    };

    let mut jwt_config = JwtConfig::new(secret, config.auth.token_expiration_hours);

    if let Some(ref audience) = config.auth.audience {
        jwt_config = jwt_config.with_audience(audience);
    }

    JwtService::new(jwt_config)
}

fn generate_ephemeral_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill(&mut bytes);
    hex::encode(bytes)
}

fn create_summarizer(
    config: &SummarizerConfig,
) -> anyhow::Result<Option<Arc<dyn SummarizerServiceTrait>>> {
    let Some(ref openai_api_key) = config.openai_api_key else {
        return Ok(None);
    };

    let client = HttpClient::with_timeout(Duration::from_secs(config.request_timeout_secs))?;

    let llm = OpenAiProvider::with_base_url(
        client.clone(),
        openai_api_key.clone(),
        config.openai_base_url.clone(),
    );

    let mut readme_source =
        GithubReadmeClient::with_base_url(client, config.github_api_url.clone());
    if let Some(ref token) = config.github_token {
        readme_source = readme_source.with_token(token.clone());
    }

    let summarizer = SummarizerService::new(Arc::new(readme_source), Arc::new(llm))
        .with_settings(SummarizerSettings {
            model: config.model.clone(),
            temperature: config.temperature,
            max_readme_chars: config.max_readme_chars,
        });

    info!(model = %config.model, "README summarizer enabled");

    Ok(Some(Arc::new(summarizer)))
}
