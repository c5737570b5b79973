//! In-memory API key repository

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::api_key::{
    sort_newest_first, ApiKey, ApiKeyId, ApiKeyPatch, ApiKeyRepository, OwnerId,
};
use crate::domain::DomainError;

/// In-memory implementation of ApiKeyRepository
///
/// All mutations happen under a single write lock, which makes the hash
/// uniqueness check, owner-scoped updates and quota consumption atomic.
#[derive(Debug, Default, Clone)]
pub struct InMemoryApiKeyRepository {
    keys: Arc<RwLock<HashMap<ApiKeyId, ApiKey>>>,
}

impl InMemoryApiKeyRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ApiKeyRepository for InMemoryApiKeyRepository {
    async fn insert(&self, api_key: ApiKey) -> Result<ApiKey, DomainError> {
        let mut keys = self.keys.write().await;

        if keys.contains_key(&api_key.id()) {
            return Err(DomainError::conflict(format!(
                "API key with ID '{}' already exists",
                api_key.id()
            )));
        }

        if keys.values().any(|k| k.key_hash() == api_key.key_hash()) {
            return Err(DomainError::conflict("API key token already exists"));
        }

        keys.insert(api_key.id(), api_key.clone());
        Ok(api_key)
    }

    async fn find_by_hash(&self, key_hash: &str) -> Result<Option<ApiKey>, DomainError> {
        let keys = self.keys.read().await;
        Ok(keys.values().find(|k| k.key_hash() == key_hash).cloned())
    }

    async fn get(&self, owner: &OwnerId, id: &ApiKeyId) -> Result<Option<ApiKey>, DomainError> {
        let keys = self.keys.read().await;
        Ok(keys.get(id).filter(|k| k.is_owned_by(owner)).cloned())
    }

    async fn update(
        &self,
        owner: &OwnerId,
        id: &ApiKeyId,
        patch: &ApiKeyPatch,
    ) -> Result<Option<ApiKey>, DomainError> {
        let mut keys = self.keys.write().await;

        let Some(key) = keys.get_mut(id).filter(|k| k.is_owned_by(owner)) else {
            return Ok(None);
        };

        key.apply(patch);
        Ok(Some(key.clone()))
    }

    async fn delete(&self, owner: &OwnerId, id: &ApiKeyId) -> Result<bool, DomainError> {
        let mut keys = self.keys.write().await;

        if !keys.get(id).is_some_and(|k| k.is_owned_by(owner)) {
            return Ok(false);
        }

        Ok(keys.remove(id).is_some())
    }

    async fn list(&self, owner: &OwnerId) -> Result<Vec<ApiKey>, DomainError> {
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
        let mut keys = self.keys.write().await;
        Ok(keys.get_mut(id).is_some_and(|k| k.consume_quota()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::api_key::KeyType;

    fn owner(id: &str) -> OwnerId {
        OwnerId::new(id).unwrap()
    }

    fn key(owner_id: &str, hash: &str, limit: u64) -> ApiKey {
        ApiKey::new(
            owner(owner_id),
            "Test",
            KeyType::Development,
            limit,
            hash,
            "aaaaaaaa",
            "bbbbbbbb",
        )
    }

    #[tokio::test]
    async fn test_insert_and_find_by_hash() {
        let repo = InMemoryApiKeyRepository::new();
        let created = repo.insert(key("alice", "sha256$a", 10)).await.unwrap();

        let found = repo.find_by_hash("sha256$a").await.unwrap();
        assert_eq!(found.map(|k| k.id()), Some(created.id()));
        assert!(repo.find_by_hash("sha256$b").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_hash_conflicts() {
        let repo = InMemoryApiKeyRepository::new();
        repo.insert(key("alice", "sha256$a", 10)).await.unwrap();

        let err = repo.insert(key("bob", "sha256$a", 10)).await.unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_owner_scoping() {
        let repo = InMemoryApiKeyRepository::new();
        let created = repo.insert(key("alice", "sha256$a", 10)).await.unwrap();
        let patch = ApiKeyPatch {
            name: Some("Stolen".to_string()),
            ..Default::default()
        };

        assert!(repo.get(&owner("bob"), &created.id()).await.unwrap().is_none());
        assert!(repo.update(&owner("bob"), &created.id(), &patch).await.unwrap().is_none());
        assert!(!repo.delete(&owner("bob"), &created.id()).await.unwrap());
        assert!(repo.list(&owner("bob")).await.unwrap().is_empty());

        let still = repo.get(&owner("alice"), &created.id()).await.unwrap().unwrap();
        assert_eq!(still.name(), "Test");
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let repo = InMemoryApiKeyRepository::new();
        let created = repo.insert(key("alice", "sha256$a", 10)).await.unwrap();
        let patch = ApiKeyPatch {
            limit: Some(50),
            ..Default::default()
        };

        let updated = repo
            .update(&owner("alice"), &created.id(), &patch)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.limit(), 50);

        assert!(repo.delete(&owner("alice"), &created.id()).await.unwrap());
        assert!(!repo.delete(&owner("alice"), &created.id()).await.unwrap());
        assert!(repo.find_by_hash("sha256$a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let repo = InMemoryApiKeyRepository::new();
        let first = repo.insert(key("alice", "sha256$1", 10)).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = repo.insert(key("alice", "sha256$2", 10)).await.unwrap();

        let listed = repo.list(&owner("alice")).await.unwrap();
        assert_eq!(
            listed.iter().map(|k| k.id()).collect::<Vec<_>>(),
            vec![second.id(), first.id()]
        );
    }

    #[tokio::test]
    async fn test_consume_quota_until_limit() {
        let repo = InMemoryApiKeyRepository::new();
        let created = repo.insert(key("alice", "sha256$a", 2)).await.unwrap();

        assert!(repo.consume_quota(&created.id()).await.unwrap());
        assert!(repo.consume_quota(&created.id()).await.unwrap());
        assert!(!repo.consume_quota(&created.id()).await.unwrap());
        assert!(!repo.consume_quota(&ApiKeyId::generate()).await.unwrap());

        let stored = repo.find_by_hash("sha256$a").await.unwrap().unwrap();
        assert_eq!(stored.usage(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_quota_consumption_never_exceeds_limit() {
        let repo = InMemoryApiKeyRepository::new();
        let created = repo.insert(key("alice", "sha256$a", 5)).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..20 {
            let repo = repo.clone();
            let id = created.id();
            handles.push(tokio::spawn(async move { repo.consume_quota(&id).await.unwrap() }));
        }

        let mut consumed = 0;
        for handle in handles {
            if handle.await.unwrap() {
                consumed += 1;
            }
        }

        assert_eq!(consumed, 5);
    }
}
