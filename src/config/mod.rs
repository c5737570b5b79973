mod app_config;

pub use app_config::{
    ApiKeysConfig, AppConfig, AuthConfig, DatabaseConfig, LogFormat, LoggingConfig,
    MetricsConfig, ServerConfig, StorageBackend, StorageConfig, SummarizerConfig,
};
