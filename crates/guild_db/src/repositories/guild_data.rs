//! Postgres repository for guild bookkeeping data

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::debug;

use guild_kernel::{BotId, GuildBotId, GuildData, GuildId, Storable};

use crate::error::DatabaseError;
use crate::pool::DatabasePool;

use super::EntityRepo;

#[derive(Debug, FromRow)]
struct GuildDataRow {
    guild_id: i64,
    bot_id: i64,
    hello_sent_at: Option<DateTime<Utc>>,
}

impl From<GuildDataRow> for GuildData {
    fn from(row: GuildDataRow) -> Self {
        GuildData {
            id: GuildBotId::new(GuildId::new(row.guild_id), BotId::new(row.bot_id)),
            hello_sent_at: row.hello_sent_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PgGuildDataRepo {
    pool: DatabasePool,
}

impl PgGuildDataRepo {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntityRepo<GuildData> for PgGuildDataRepo {
    async fn fetch(&self, key: &GuildBotId) -> Result<GuildData, DatabaseError> {
        debug!(id = %key, "fetching guild data");
        let row = sqlx::query_as::<_, GuildDataRow>(
            "SELECT guild_id, bot_id, hello_sent_at FROM guild_data WHERE guild_id = $1 AND bot_id = $2",
        )
        .bind(key.guild.get())
        .bind(key.bot.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row
            .map(GuildData::from)
            .unwrap_or_else(|| GuildData::default_for(*key)))
    }

    async fn merge(&self, entity: GuildData) -> Result<GuildData, DatabaseError> {
        let row = sqlx::query_as::<_, GuildDataRow>(
            r#"
            INSERT INTO guild_data (guild_id, bot_id, hello_sent_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (guild_id, bot_id) DO UPDATE
                SET hello_sent_at = EXCLUDED.hello_sent_at
            RETURNING guild_id, bot_id, hello_sent_at
            "#,
        )
        .bind(entity.id.guild.get())
        .bind(entity.id.bot.get())
        .bind(entity.hello_sent_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn delete(&self, key: &GuildBotId) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM guild_data WHERE guild_id = $1 AND bot_id = $2")
            .bind(key.guild.get())
            .bind(key.bot.get())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
