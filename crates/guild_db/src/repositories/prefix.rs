//! Postgres repository for prefix mappings
//!
//! Besides the uniform contract this repository exposes the raw-prefix read
//! used on the message-dispatch hot path: a single column lookup that skips
//! default materialization entirely.

use async_trait::async_trait;
use sqlx::FromRow;
use tracing::debug;

use guild_kernel::{BotId, GuildBotId, GuildId, Prefix, Storable};

use crate::error::DatabaseError;
use crate::pool::DatabasePool;

use super::{EntityRepo, PrefixStore};

#[derive(Debug, FromRow)]
struct PrefixRow {
    guild_id: i64,
    bot_id: i64,
    prefix: Option<String>,
}

impl From<PrefixRow> for Prefix {
    fn from(row: PrefixRow) -> Self {
        Prefix {
            id: GuildBotId::new(GuildId::new(row.guild_id), BotId::new(row.bot_id)),
            prefix: row.prefix,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PgPrefixRepo {
    pool: DatabasePool,
}

impl PgPrefixRepo {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntityRepo<Prefix> for PgPrefixRepo {
    async fn fetch(&self, key: &GuildBotId) -> Result<Prefix, DatabaseError> {
        debug!(id = %key, "fetching prefix entity");
        let row = sqlx::query_as::<_, PrefixRow>(
            "SELECT guild_id, bot_id, prefix FROM prefixes WHERE guild_id = $1 AND bot_id = $2",
        )
        .bind(key.guild.get())
        .bind(key.bot.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row
            .map(Prefix::from)
            .unwrap_or_else(|| Prefix::default_for(*key)))
    }

    async fn merge(&self, entity: Prefix) -> Result<Prefix, DatabaseError> {
        let row = sqlx::query_as::<_, PrefixRow>(
            r#"
            INSERT INTO prefixes (guild_id, bot_id, prefix)
            VALUES ($1, $2, $3)
            ON CONFLICT (guild_id, bot_id) DO UPDATE
                SET prefix = EXCLUDED.prefix
            RETURNING guild_id, bot_id, prefix
            "#,
        )
        .bind(entity.id.guild.get())
        .bind(entity.id.bot.get())
        .bind(&entity.prefix)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn delete(&self, key: &GuildBotId) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM prefixes WHERE guild_id = $1 AND bot_id = $2")
            .bind(key.guild.get())
            .bind(key.bot.get())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl PrefixStore for PgPrefixRepo {
    async fn raw_prefix(&self, key: &GuildBotId) -> Result<Option<String>, DatabaseError> {
        let stored: Option<Option<String>> = sqlx::query_scalar(
            "SELECT prefix FROM prefixes WHERE guild_id = $1 AND bot_id = $2",
        )
        .bind(key.guild.get())
        .bind(key.bot.get())
        .fetch_optional(&self.pool)
        .await?;

        // no row and a row with NULL prefix both mean "nothing configured"
        Ok(stored.flatten())
    }
}
