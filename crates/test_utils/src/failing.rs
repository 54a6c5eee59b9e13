//! Stores that always fail
//!
//! [`FailingStore`] implements every repository trait and returns a
//! connection failure from each operation. Suites use it to verify that the
//! gateway flattens backend failures into its single opaque error.

use async_trait::async_trait;

use guild_db::repositories::{EntityRepo, PrefixStore, SearchResultStore};
use guild_db::DatabaseError;
use guild_kernel::{GuildBotId, SearchResult, SearchResultId, Storable};

/// Implements all store traits; every call fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingStore;

impl FailingStore {
    fn error() -> DatabaseError {
        DatabaseError::connection_failed("simulated backend failure")
    }
}

#[async_trait]
impl<E: Storable> EntityRepo<E> for FailingStore {
    async fn fetch(&self, _key: &E::Key) -> Result<E, DatabaseError> {
        Err(Self::error())
    }

    async fn merge(&self, _entity: E) -> Result<E, DatabaseError> {
        Err(Self::error())
    }

    async fn delete(&self, _key: &E::Key) -> Result<(), DatabaseError> {
        Err(Self::error())
    }
}

#[async_trait]
impl PrefixStore for FailingStore {
    async fn raw_prefix(&self, _key: &GuildBotId) -> Result<Option<String>, DatabaseError> {
        Err(Self::error())
    }
}

#[async_trait]
impl SearchResultStore for FailingStore {
    async fn merge(&self, _result: SearchResult) -> Result<SearchResult, DatabaseError> {
        Err(Self::error())
    }

    async fn fetch_max_aged(
        &self,
        _id: &SearchResultId,
        _max_age_millis: i64,
    ) -> Result<Option<SearchResult>, DatabaseError> {
        Err(Self::error())
    }
}
