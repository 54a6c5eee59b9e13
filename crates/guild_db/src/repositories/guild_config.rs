//! Postgres repository for guild configuration

use async_trait::async_trait;
use sqlx::FromRow;
use tracing::debug;

use guild_kernel::{BotId, GuildBotId, GuildConfig, GuildId, Storable};

use crate::error::DatabaseError;
use crate::pool::DatabasePool;

use super::EntityRepo;

#[derive(Debug, FromRow)]
struct GuildConfigRow {
    guild_id: i64,
    bot_id: i64,
    track_announce: bool,
    auto_resume: bool,
    language: String,
}

impl From<GuildConfigRow> for GuildConfig {
    fn from(row: GuildConfigRow) -> Self {
        GuildConfig {
            id: GuildBotId::new(GuildId::new(row.guild_id), BotId::new(row.bot_id)),
            track_announce: row.track_announce,
            auto_resume: row.auto_resume,
            language: row.language,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PgGuildConfigRepo {
    pool: DatabasePool,
}

impl PgGuildConfigRepo {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntityRepo<GuildConfig> for PgGuildConfigRepo {
    async fn fetch(&self, key: &GuildBotId) -> Result<GuildConfig, DatabaseError> {
        debug!(id = %key, "fetching guild config");
        let row = sqlx::query_as::<_, GuildConfigRow>(
            r#"
            SELECT guild_id, bot_id, track_announce, auto_resume, language
            FROM guild_config
            WHERE guild_id = $1 AND bot_id = $2
            "#,
        )
        .bind(key.guild.get())
        .bind(key.bot.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row
            .map(GuildConfig::from)
            .unwrap_or_else(|| GuildConfig::default_for(*key)))
    }

    async fn merge(&self, entity: GuildConfig) -> Result<GuildConfig, DatabaseError> {
        let row = sqlx::query_as::<_, GuildConfigRow>(
            r#"
            INSERT INTO guild_config (guild_id, bot_id, track_announce, auto_resume, language)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (guild_id, bot_id) DO UPDATE
                SET track_announce = EXCLUDED.track_announce,
                    auto_resume = EXCLUDED.auto_resume,
                    language = EXCLUDED.language
            RETURNING guild_id, bot_id, track_announce, auto_resume, language
            "#,
        )
        .bind(entity.id.guild.get())
        .bind(entity.id.bot.get())
        .bind(entity.track_announce)
        .bind(entity.auto_resume)
        .bind(&entity.language)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn delete(&self, key: &GuildBotId) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM guild_config WHERE guild_id = $1 AND bot_id = $2")
            .bind(key.guild.get())
            .bind(key.bot.get())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
