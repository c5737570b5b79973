//! API Key repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{ApiKey, ApiKeyId, ApiKeyPatch, OwnerId};
use crate::domain::DomainError;

/// Repository trait for API key storage
///
/// Every owner-facing operation takes the owner explicitly and only ever
/// touches records created by that owner. A key that exists under another
/// owner behaves exactly like a missing one.
#[async_trait]
pub trait ApiKeyRepository: Send + Sync + Debug {
    /// Insert a new key; a duplicate hash yields `DomainError::Conflict`
    async fn insert(&self, api_key: ApiKey) -> Result<ApiKey, DomainError>;

    /// Look up a key by the hash of its token, regardless of owner
    async fn find_by_hash(&self, key_hash: &str) -> Result<Option<ApiKey>, DomainError>;

    /// Get an owner's key by ID
    async fn get(&self, owner: &OwnerId, id: &ApiKeyId) -> Result<Option<ApiKey>, DomainError>;

    /// Apply a partial update to an owner's key
    async fn update(
        &self,
        owner: &OwnerId,
        id: &ApiKeyId,
        patch: &ApiKeyPatch,
    ) -> Result<Option<ApiKey>, DomainError>;

    /// Delete an owner's key
    async fn delete(&self, owner: &OwnerId, id: &ApiKeyId) -> Result<bool, DomainError>;

    /// List an owner's keys, newest first
    async fn list(&self, owner: &OwnerId) -> Result<Vec<ApiKey>, DomainError>;

    /// Atomically increment usage if the key is still under its limit
    async fn consume_quota(&self, id: &ApiKeyId) -> Result<bool, DomainError>;

    /// Check the store is reachable
    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

/// Order keys newest first, ties broken by ID
pub fn sort_newest_first(keys: &mut [ApiKey]) {
    keys.sort_by(|a, b| {
        b.created_at()
            .cmp(&a.created_at())
            .then_with(|| a.id().as_uuid().cmp(b.id().as_uuid()))
    });
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// Mock API key repository for testing
    #[derive(Debug, Default)]
    pub struct MockApiKeyRepository {
        keys: Arc<RwLock<HashMap<ApiKeyId, ApiKey>>>,
        should_fail: Arc<RwLock<bool>>,
        forced_conflicts: Arc<RwLock<usize>>,
        insert_attempts: Arc<RwLock<usize>>,
    }

    impl MockApiKeyRepository {
        /// Create a new mock repository
        pub fn new() -> Self {
            Self::default()
        }

        /// Set whether operations should fail
        pub async fn set_should_fail(&self, fail: bool) {
            *self.should_fail.write().await = fail;
        }

        /// Make the next `count` inserts report a hash collision
        pub async fn force_conflicts(&self, count: usize) {
            *self.forced_conflicts.write().await = count;
        }

        /// Number of insert calls seen so far
        pub async fn insert_attempts(&self) -> usize {
            *self.insert_attempts.read().await
        }

        async fn check_should_fail(&self) -> Result<(), DomainError> {
            if *self.should_fail.read().await {
                return Err(DomainError::storage("Mock repository configured to fail"));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl ApiKeyRepository for MockApiKeyRepository {
        async fn insert(&self, api_key: ApiKey) -> Result<ApiKey, DomainError> {
            self.check_should_fail().await?;
            *self.insert_attempts.write().await += 1;

            {
                let mut forced = self.forced_conflicts.write().await;
                if *forced > 0 {
                    *forced -= 1;
                    return Err(DomainError::conflict("API key hash already exists"));
                }
            }

            let mut keys = self.keys.write().await;

            if keys.values().any(|k| k.key_hash() == api_key.key_hash()) {
                return Err(DomainError::conflict("API key hash already exists"));
            }

            keys.insert(api_key.id(), api_key.clone());
            Ok(api_key)
        }

        async fn find_by_hash(&self, key_hash: &str) -> Result<Option<ApiKey>, DomainError> {
            self.check_should_fail().await?;
            let keys = self.keys.read().await;
            Ok(keys.values().find(|k| k.key_hash() == key_hash).cloned())
        }

        async fn get(&self, owner: &OwnerId, id: &ApiKeyId) -> Result<Option<ApiKey>, DomainError> {
            self.check_should_fail().await?;
            let keys = self.keys.read().await;
            Ok(keys.get(id).filter(|k| k.is_owned_by(owner)).cloned())
        }

        async fn update(
            &self,
            owner: &OwnerId,
            id: &ApiKeyId,
            patch: &ApiKeyPatch,
        ) -> Result<Option<ApiKey>, DomainError> {
            self.check_should_fail().await?;
            let mut keys = self.keys.write().await;

            match keys.get_mut(id).filter(|k| k.is_owned_by(owner)) {
                Some(key) => {
                    key.apply(patch);
                    Ok(Some(key.clone()))
                }
                None => Ok(None),
            }
        }

        async fn delete(&self, owner: &OwnerId, id: &ApiKeyId) -> Result<bool, DomainError> {
            self.check_should_fail().await?;
            let mut keys = self.keys.write().await;

            if keys.get(id).is_some_and(|k| k.is_owned_by(owner)) {
                keys.remove(id);
                return Ok(true);
            }

            Ok(false)
        }

        async fn list(&self, owner: &OwnerId) -> Result<Vec<ApiKey>, DomainError> {
            self.check_should_fail().await?;
            let keys = self.keys.read().await;

            let mut result: Vec<ApiKey> = keys
                .values()
                .filter(|k| k.is_owned_by(owner))
                .cloned()
                .collect();
            sort_newest_first(&mut result);

            Ok(result)
        }

        async fn consume_quota(&self, id: &ApiKeyId) -> Result<bool, DomainError> {
            self.check_should_fail().await?;
            let mut keys = self.keys.write().await;

            Ok(keys.get_mut(id).is_some_and(|k| k.consume_quota()))
        }

        async fn ping(&self) -> Result<(), DomainError> {
            self.check_should_fail().await
        }
    }
}
