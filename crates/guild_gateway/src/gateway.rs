//! The entity gateway façade
//!
//! Glue between the application and the entity repositories: commonly used
//! reads and writes for every entity kind, each wrapped in error translation,
//! plus the fetch→transform→merge protocol.
//!
//! The gateway builds composite keys itself from its configured [`BotId`],
//! so callers address guild-scoped entities by bare [`GuildId`].

use std::sync::Arc;

use tracing::error;

use guild_db::repositories::{
    EntityRepo, PgBlacklistRepo, PgGuildConfigRepo, PgGuildDataRepo, PgGuildModulesRepo,
    PgGuildPermsRepo, PgPrefixRepo, PgSearchResultRepo, PrefixStore, SearchResultStore,
};
use guild_db::repositories::{MemoryPrefixStore, MemoryRepo, MemorySearchResultStore};
use guild_db::{DatabaseError, DatabasePool};
use guild_kernel::{
    BlacklistEntry, BotId, GuildBotId, GuildConfig, GuildData, GuildId, GuildModules,
    GuildPermissions, Prefix, SearchResult, SearchResultId, Storable,
};

use crate::error::GatewayError;

/// Single persistence façade over all entity repositories.
///
/// One instance exists per process, constructed after the connection
/// supervisor has both pools up, and shared via `Arc`. All methods are safe
/// to call concurrently.
pub struct EntityGateway {
    bot_id: BotId,
    blacklist: Arc<dyn EntityRepo<BlacklistEntry>>,
    guild_configs: Arc<dyn EntityRepo<GuildConfig>>,
    guild_data: Arc<dyn EntityRepo<GuildData>>,
    guild_modules: Arc<dyn EntityRepo<GuildModules>>,
    guild_permissions: Arc<dyn EntityRepo<GuildPermissions>>,
    prefixes: Arc<dyn PrefixStore>,
    search_results: Option<Arc<dyn SearchResultStore>>,
}

impl EntityGateway {
    /// Builds a gateway over explicit repository instances.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        bot_id: BotId,
        blacklist: Arc<dyn EntityRepo<BlacklistEntry>>,
        guild_configs: Arc<dyn EntityRepo<GuildConfig>>,
        guild_data: Arc<dyn EntityRepo<GuildData>>,
        guild_modules: Arc<dyn EntityRepo<GuildModules>>,
        guild_permissions: Arc<dyn EntityRepo<GuildPermissions>>,
        prefixes: Arc<dyn PrefixStore>,
        search_results: Option<Arc<dyn SearchResultStore>>,
    ) -> Self {
        Self {
            bot_id,
            blacklist,
            guild_configs,
            guild_data,
            guild_modules,
            guild_permissions,
            prefixes,
            search_results,
        }
    }

    /// Wires the gateway over Postgres repositories: one set on the primary
    /// pool, and the search store on the cache pool when one is configured.
    pub fn postgres(bot_id: BotId, primary: DatabasePool, cache: Option<DatabasePool>) -> Self {
        Self::new(
            bot_id,
            Arc::new(PgBlacklistRepo::new(primary.clone())),
            Arc::new(PgGuildConfigRepo::new(primary.clone())),
            Arc::new(PgGuildDataRepo::new(primary.clone())),
            Arc::new(PgGuildModulesRepo::new(primary.clone())),
            Arc::new(PgGuildPermsRepo::new(primary.clone())),
            Arc::new(PgPrefixRepo::new(primary)),
            cache.map(|pool| {
                Arc::new(PgSearchResultRepo::new(pool)) as Arc<dyn SearchResultStore>
            }),
        )
    }

    /// Wires the gateway over in-memory repositories. Used by tests and as a
    /// throwaway development backend.
    pub fn in_memory(bot_id: BotId, with_cache: bool) -> Self {
        Self::new(
            bot_id,
            Arc::new(MemoryRepo::<BlacklistEntry>::new()),
            Arc::new(MemoryRepo::<GuildConfig>::new()),
            Arc::new(MemoryRepo::<GuildData>::new()),
            Arc::new(MemoryRepo::<GuildModules>::new()),
            Arc::new(MemoryRepo::<GuildPermissions>::new()),
            Arc::new(MemoryPrefixStore::new()),
            with_cache
                .then(|| Arc::new(MemorySearchResultStore::new()) as Arc<dyn SearchResultStore>),
        )
    }

    pub fn bot_id(&self) -> BotId {
        self.bot_id
    }

    /// Whether the result cache tier is available.
    pub fn has_cache(&self) -> bool {
        self.search_results.is_some()
    }

    fn guild_key(&self, guild: GuildId) -> GuildBotId {
        GuildBotId::new(guild, self.bot_id)
    }

    /// Error boundary: backend failures are logged here, exactly once, and
    /// flattened into [`GatewayError`]. Callers must not log them again.
    fn translate<T>(result: Result<T, DatabaseError>) -> Result<T, GatewayError> {
        result.map_err(|cause| {
            error!(error = %cause, "entity gateway database operation failed");
            GatewayError::new(cause)
        })
    }

    /// fetch→transform→merge.
    ///
    /// This is a two-step read-then-write without cross-step isolation:
    /// concurrent transforms of the same key can interleave, and the later
    /// merge overwrites the earlier one (the update is lost, the row stays
    /// consistent). Callers that cannot accept a lost update must serialize
    /// their transforms per key.
    async fn transform<E>(
        repo: &Arc<dyn EntityRepo<E>>,
        key: E::Key,
        transform_fn: impl FnOnce(E) -> E + Send,
    ) -> Result<E, DatabaseError>
    where
        E: Storable,
    {
        let current = repo.fetch(&key).await?;
        repo.merge(transform_fn(current)).await
    }

    // Blacklist

    pub async fn fetch_blacklist_entry(&self, id: i64) -> Result<BlacklistEntry, GatewayError> {
        Self::translate(self.blacklist.fetch(&id).await)
    }

    pub async fn merge_blacklist_entry(
        &self,
        entry: BlacklistEntry,
    ) -> Result<BlacklistEntry, GatewayError> {
        Self::translate(self.blacklist.merge(entry).await)
    }

    pub async fn delete_blacklist_entry(&self, id: i64) -> Result<(), GatewayError> {
        Self::translate(self.blacklist.delete(&id).await)
    }

    // Guild config

    pub async fn fetch_guild_config(&self, guild: GuildId) -> Result<GuildConfig, GatewayError> {
        Self::translate(self.guild_configs.fetch(&self.guild_key(guild)).await)
    }

    pub async fn transform_guild_config(
        &self,
        guild: GuildId,
        transform_fn: impl FnOnce(GuildConfig) -> GuildConfig + Send,
    ) -> Result<GuildConfig, GatewayError> {
        Self::translate(
            Self::transform(&self.guild_configs, self.guild_key(guild), transform_fn).await,
        )
    }

    // Guild data

    pub async fn fetch_guild_data(&self, guild: GuildId) -> Result<GuildData, GatewayError> {
        Self::translate(self.guild_data.fetch(&self.guild_key(guild)).await)
    }

    pub async fn transform_guild_data(
        &self,
        guild: GuildId,
        transform_fn: impl FnOnce(GuildData) -> GuildData + Send,
    ) -> Result<GuildData, GatewayError> {
        Self::translate(
            Self::transform(&self.guild_data, self.guild_key(guild), transform_fn).await,
        )
    }

    // Guild modules

    pub async fn fetch_guild_modules(&self, guild: GuildId) -> Result<GuildModules, GatewayError> {
        Self::translate(self.guild_modules.fetch(&self.guild_key(guild)).await)
    }

    pub async fn transform_guild_modules(
        &self,
        guild: GuildId,
        transform_fn: impl FnOnce(GuildModules) -> GuildModules + Send,
    ) -> Result<GuildModules, GatewayError> {
        Self::translate(
            Self::transform(&self.guild_modules, self.guild_key(guild), transform_fn).await,
        )
    }

    // Guild permissions

    pub async fn fetch_guild_permissions(
        &self,
        guild: GuildId,
    ) -> Result<GuildPermissions, GatewayError> {
        Self::translate(self.guild_permissions.fetch(&self.guild_key(guild)).await)
    }

    pub async fn transform_guild_permissions(
        &self,
        guild: GuildId,
        transform_fn: impl FnOnce(GuildPermissions) -> GuildPermissions + Send,
    ) -> Result<GuildPermissions, GatewayError> {
        Self::translate(
            Self::transform(&self.guild_permissions, self.guild_key(guild), transform_fn).await,
        )
    }

    // Prefix

    pub async fn transform_prefix(
        &self,
        guild: GuildId,
        transform_fn: impl FnOnce(Prefix) -> Prefix + Send,
    ) -> Result<Prefix, GatewayError> {
        let key = self.guild_key(guild);
        let current = Self::translate(self.prefixes.fetch(&key).await)?;
        Self::translate(self.prefixes.merge(transform_fn(current)).await)
    }

    /// The stored prefix override for `guild`, or `None` when nothing is
    /// configured. Absence is not an error; the caller applies its own
    /// fallback (usually [`guild_kernel::DEFAULT_PREFIX`]).
    pub async fn get_prefix(&self, guild: GuildId) -> Result<Option<String>, GatewayError> {
        Self::translate(self.prefixes.raw_prefix(&self.guild_key(guild)).await)
    }

    // Search result cache tier

    /// Merges a search result into the cache database.
    ///
    /// Returns the canonical stored copy, or `None` (not an error) when no
    /// cache database is configured.
    pub async fn merge_search_result(
        &self,
        result: SearchResult,
    ) -> Result<Option<SearchResult>, GatewayError> {
        match &self.search_results {
            Some(store) => Self::translate(store.merge(result).await).map(Some),
            None => Ok(None),
        }
    }

    /// Looks up a cached search result no older than `max_age_millis`
    /// (negative = no expiry). `None` for a missing entry, a stale entry, or
    /// when no cache database is configured.
    pub async fn get_search_result(
        &self,
        id: &SearchResultId,
        max_age_millis: i64,
    ) -> Result<Option<SearchResult>, GatewayError> {
        match &self.search_results {
            Some(store) => Self::translate(store.fetch_max_aged(id, max_age_millis).await),
            None => Ok(None),
        }
    }
}
