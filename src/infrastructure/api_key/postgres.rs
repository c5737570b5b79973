//! PostgreSQL API key repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::api_key::{
    ApiKey, ApiKeyId, ApiKeyParts, ApiKeyPatch, ApiKeyRepository, KeyType, OwnerId,
};
use crate::domain::DomainError;

const SELECT_COLUMNS: &str = "id, name, key_hash, key_prefix, key_suffix, key_type, usage, \
                              usage_limit, created_by, created_at, updated_at";

/// PostgreSQL implementation of ApiKeyRepository
///
/// Every owner-facing statement carries `created_by = $2` in its predicate.
#[derive(Debug, Clone)]
pub struct PostgresApiKeyRepository {
    pool: PgPool,
}

impl PostgresApiKeyRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .is_some_and(|e| e.is_unique_violation())
}

fn to_db_limit(limit: u64) -> Result<i64, DomainError> {
    i64::try_from(limit)
        .map_err(|_| DomainError::validation(format!("Usage limit {} is too large", limit)))
}

#[async_trait]
impl ApiKeyRepository for PostgresApiKeyRepository {
    async fn insert(&self, api_key: ApiKey) -> Result<ApiKey, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO api_keys (id, name, key_hash, key_prefix, key_suffix, key_type,
                                  usage, usage_limit, created_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(*api_key.id().as_uuid())
        .bind(api_key.name())
        .bind(api_key.key_hash())
        .bind(api_key.key_prefix())
        .bind(api_key.key_suffix())
        .bind(api_key.key_type().as_str())
        .bind(api_key.usage() as i64)
        .bind(to_db_limit(api_key.limit())?)
        .bind(api_key.created_by().as_str())
        .bind(api_key.created_at())
        .bind(api_key.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::conflict("API key token already exists")
            } else {
                DomainError::storage(format!("Failed to create API key: {}", e))
            }
        })?;

        Ok(api_key)
    }

    async fn find_by_hash(&self, key_hash: &str) -> Result<Option<ApiKey>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM api_keys WHERE key_hash = $1",
            SELECT_COLUMNS
        ))
        .bind(key_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to look up API key: {}", e)))?;

        row.as_ref().map(row_to_api_key).transpose()
    }

    async fn get(&self, owner: &OwnerId, id: &ApiKeyId) -> Result<Option<ApiKey>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM api_keys WHERE id = $1 AND created_by = $2",
            SELECT_COLUMNS
        ))
        .bind(*id.as_uuid())
        .bind(owner.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get API key: {}", e)))?;

        row.as_ref().map(row_to_api_key).transpose()
    }

    async fn update(
        &self,
        owner: &OwnerId,
        id: &ApiKeyId,
        patch: &ApiKeyPatch,
    ) -> Result<Option<ApiKey>, DomainError> {
        let limit = patch.limit.map(to_db_limit).transpose()?;

        let row = sqlx::query(&format!(
            r#"
            UPDATE api_keys
            SET name = COALESCE($3, name),
                key_type = COALESCE($4, key_type),
                usage_limit = COALESCE($5, usage_limit),
                updated_at = NOW()
            WHERE id = $1 AND created_by = $2
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(*id.as_uuid())
        .bind(owner.as_str())
        .bind(patch.name.as_deref())
        .bind(patch.key_type.map(|t| t.as_str()))
        .bind(limit)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to update API key: {}", e)))?;

        row.as_ref().map(row_to_api_key).transpose()
    }

    async fn delete(&self, owner: &OwnerId, id: &ApiKeyId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM api_keys WHERE id = $1 AND created_by = $2")
            .bind(*id.as_uuid())
            .bind(owner.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete API key: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, owner: &OwnerId) -> Result<Vec<ApiKey>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM api_keys WHERE created_by = $1 ORDER BY created_at DESC, id",
            SELECT_COLUMNS
        ))
        .bind(owner.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list API keys: {}", e)))?;

        rows.iter().map(row_to_api_key).collect()
    }

    async fn consume_quota(&self, id: &ApiKeyId) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "UPDATE api_keys SET usage = usage + 1 WHERE id = $1 AND usage < usage_limit",
        )
        .bind(*id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to record API key usage: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Database ping failed: {}", e)))?;

        Ok(())
    }
}

fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(name)
        .map_err(|e| DomainError::storage(format!("Failed to read column '{}': {}", name, e)))
}

fn row_to_api_key(row: &PgRow) -> Result<ApiKey, DomainError> {
    let id: Uuid = column(row, "id")?;
    let key_type: String = column(row, "key_type")?;
    let usage: i64 = column(row, "usage")?;
    let limit: i64 = column(row, "usage_limit")?;
    let created_by: String = column(row, "created_by")?;
    let created_at: DateTime<Utc> = column(row, "created_at")?;
    let updated_at: DateTime<Utc> = column(row, "updated_at")?;

    Ok(ApiKey::from_parts(ApiKeyParts {
        id: ApiKeyId::from(id),
        name: column(row, "name")?,
        key_hash: column(row, "key_hash")?,
        key_prefix: column(row, "key_prefix")?,
        key_suffix: column(row, "key_suffix")?,
        key_type: KeyType::parse(&key_type)
            .map_err(|e| DomainError::storage(format!("Corrupt API key row: {}", e)))?,
        usage: usage.max(0) as u64,
        limit: limit.max(0) as u64,
        created_by: OwnerId::new(created_by)
            .map_err(|e| DomainError::storage(format!("Corrupt API key row: {}", e)))?,
        created_at,
        updated_at,
    }))
}
