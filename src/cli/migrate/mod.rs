//! Migrate command - applies pending schema migrations

use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::storage::{connect_pool, run_migrations};

/// Apply pending migrations against the configured database
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_logging(&config.logging);

    let pg_config = config.database.postgres_config().ok_or_else(|| {
        anyhow::anyhow!("database.url or the DATABASE_URL environment variable is required")
    })?;

    let pool = connect_pool(&pg_config).await?;
    let applied = run_migrations(&pool).await?;

    info!(applied, "Migrations complete");
    pool.close().await;

    Ok(())
}
