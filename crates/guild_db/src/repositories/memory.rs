//! In-memory implementations of the repository contracts
//!
//! Used by the test suites and as a no-database development backend. These
//! honor the same semantics as the Postgres repositories: default-on-absence
//! fetch, last-write-wins merge under an exclusive lock, idempotent delete,
//! read-time staleness for the search store.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use chrono::Utc;
use guild_kernel::{GuildBotId, Prefix, SearchResult, SearchResultId, Storable};

use crate::error::DatabaseError;

use super::{EntityRepo, PrefixStore, SearchResultStore};

/// Map-backed repository for any entity kind.
pub struct MemoryRepo<E: Storable> {
    rows: RwLock<HashMap<E::Key, E>>,
}

impl<E: Storable> Default for MemoryRepo<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Storable> MemoryRepo<E> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored entities; handy in assertions.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl<E: Storable> EntityRepo<E> for MemoryRepo<E> {
    async fn fetch(&self, key: &E::Key) -> Result<E, DatabaseError> {
        let rows = self.rows.read().await;
        Ok(rows
            .get(key)
            .cloned()
            .unwrap_or_else(|| E::default_for(key.clone())))
    }

    async fn merge(&self, entity: E) -> Result<E, DatabaseError> {
        let mut rows = self.rows.write().await;
        rows.insert(entity.key(), entity.clone());
        Ok(entity)
    }

    async fn delete(&self, key: &E::Key) -> Result<(), DatabaseError> {
        let mut rows = self.rows.write().await;
        rows.remove(key);
        Ok(())
    }
}

/// Prefix repository over [`MemoryRepo`], with the raw-prefix read.
#[derive(Default)]
pub struct MemoryPrefixStore {
    inner: MemoryRepo<Prefix>,
}

impl MemoryPrefixStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryRepo::new(),
        }
    }
}

#[async_trait]
impl EntityRepo<Prefix> for MemoryPrefixStore {
    async fn fetch(&self, key: &GuildBotId) -> Result<Prefix, DatabaseError> {
        self.inner.fetch(key).await
    }

    async fn merge(&self, entity: Prefix) -> Result<Prefix, DatabaseError> {
        self.inner.merge(entity).await
    }

    async fn delete(&self, key: &GuildBotId) -> Result<(), DatabaseError> {
        self.inner.delete(key).await
    }
}

#[async_trait]
impl PrefixStore for MemoryPrefixStore {
    async fn raw_prefix(&self, key: &GuildBotId) -> Result<Option<String>, DatabaseError> {
        let rows = self.inner.rows.read().await;
        Ok(rows.get(key).and_then(|p| p.prefix.clone()))
    }
}

/// Search-result store with read-time staleness against the wall clock.
#[derive(Debug, Default)]
pub struct MemorySearchResultStore {
    rows: RwLock<HashMap<SearchResultId, SearchResult>>,
}

impl MemorySearchResultStore {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl SearchResultStore for MemorySearchResultStore {
    async fn merge(&self, result: SearchResult) -> Result<SearchResult, DatabaseError> {
        let mut rows = self.rows.write().await;
        rows.insert(result.id.clone(), result.clone());
        Ok(result)
    }

    async fn fetch_max_aged(
        &self,
        id: &SearchResultId,
        max_age_millis: i64,
    ) -> Result<Option<SearchResult>, DatabaseError> {
        let rows = self.rows.read().await;
        Ok(rows
            .get(id)
            .filter(|r| r.is_fresh(Utc::now(), max_age_millis))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guild_kernel::{BotId, GuildConfig, GuildId};

    fn key() -> GuildBotId {
        GuildBotId::new(GuildId::new(10), BotId::new(20))
    }

    #[tokio::test]
    async fn test_fetch_unwritten_returns_default_without_storing() {
        let repo: MemoryRepo<GuildConfig> = MemoryRepo::new();
        let config = repo.fetch(&key()).await.unwrap();
        assert_eq!(config, GuildConfig::default_for(key()));
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_merge_then_fetch_roundtrips() {
        let repo: MemoryRepo<GuildConfig> = MemoryRepo::new();
        let stored = repo
            .merge(GuildConfig::default_for(key()).with_track_announce(true))
            .await
            .unwrap();
        let fetched = repo.fetch(&key()).await.unwrap();
        assert_eq!(stored, fetched);
        assert!(fetched.track_announce);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let repo: MemoryRepo<GuildConfig> = MemoryRepo::new();
        repo.merge(GuildConfig::default_for(key())).await.unwrap();
        repo.delete(&key()).await.unwrap();
        repo.delete(&key()).await.unwrap();
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_raw_prefix_distinguishes_unset_from_missing_row() {
        let store = MemoryPrefixStore::new();
        assert_eq!(store.raw_prefix(&key()).await.unwrap(), None);

        store
            .merge(Prefix::default_for(key()))
            .await
            .unwrap();
        assert_eq!(store.raw_prefix(&key()).await.unwrap(), None);

        store
            .merge(Prefix::default_for(key()).with_prefix(";;"))
            .await
            .unwrap();
        assert_eq!(store.raw_prefix(&key()).await.unwrap(), Some(";;".to_string()));
    }
}
