//! Entity repositories
//!
//! One uniform contract, parameterized by entity kind, with one concrete
//! Postgres implementation per kind and an in-memory implementation of the
//! same traits for DB-free testing and development.
//!
//! The contract deliberately has no notion of absence on the read path:
//! `fetch` of a never-written key returns the kind's default value. `merge`
//! is create-or-update and returns the canonical stored copy; per-key
//! atomicity comes from the database upsert (last write wins). `delete` is
//! idempotent.

pub mod blacklist;
pub mod guild_config;
pub mod guild_data;
pub mod guild_modules;
pub mod guild_perms;
pub mod memory;
pub mod prefix;
pub mod search_result;

pub use blacklist::PgBlacklistRepo;
pub use guild_config::PgGuildConfigRepo;
pub use guild_data::PgGuildDataRepo;
pub use guild_modules::PgGuildModulesRepo;
pub use guild_perms::PgGuildPermsRepo;
pub use memory::{MemoryPrefixStore, MemoryRepo, MemorySearchResultStore};
pub use prefix::PgPrefixRepo;
pub use search_result::PgSearchResultRepo;

use async_trait::async_trait;
use guild_kernel::{GuildBotId, Prefix, SearchResult, SearchResultId, Storable};

use crate::error::DatabaseError;

/// Uniform data-access contract, one instance per entity kind.
#[async_trait]
pub trait EntityRepo<E: Storable>: Send + Sync {
    /// Returns the stored entity for `key`, or a fresh default if none
    /// exists. Absence is not an error.
    async fn fetch(&self, key: &E::Key) -> Result<E, DatabaseError>;

    /// Create-or-update. Returns the persisted canonical copy, which may
    /// differ from the input (e.g. database-generated fields).
    async fn merge(&self, entity: E) -> Result<E, DatabaseError>;

    /// Removes the entity for `key`; deleting an absent key is not an error.
    async fn delete(&self, key: &E::Key) -> Result<(), DatabaseError>;
}

/// Prefix repository with the one extra read the message-dispatch hot path
/// needs: the raw stored override, without materializing a default entity.
#[async_trait]
pub trait PrefixStore: EntityRepo<Prefix> {
    async fn raw_prefix(&self, key: &GuildBotId) -> Result<Option<String>, DatabaseError>;
}

/// Cache-tier store for expensive lookups.
///
/// Not an [`EntityRepo`]: the read path takes a maximum age instead of
/// defaulting, and there is no delete — stale rows are simply overwritten by
/// later merges.
#[async_trait]
pub trait SearchResultStore: Send + Sync {
    /// Create-or-update, returning the canonical stored copy.
    async fn merge(&self, result: SearchResult) -> Result<SearchResult, DatabaseError>;

    /// Returns the stored result for `id` unless it is older than
    /// `max_age_millis` (negative = never expires). A stale row is treated
    /// as absent but not removed.
    async fn fetch_max_aged(
        &self,
        id: &SearchResultId,
        max_age_millis: i64,
    ) -> Result<Option<SearchResult>, DatabaseError>;
}
