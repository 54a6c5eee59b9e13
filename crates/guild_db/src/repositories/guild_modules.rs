//! Postgres repository for guild module toggles

use async_trait::async_trait;
use sqlx::FromRow;
use tracing::debug;

use guild_kernel::{BotId, GuildBotId, GuildId, GuildModules, Storable};

use crate::error::DatabaseError;
use crate::pool::DatabasePool;

use super::EntityRepo;

#[derive(Debug, FromRow)]
struct GuildModulesRow {
    guild_id: i64,
    bot_id: i64,
    admin: Option<bool>,
    info: Option<bool>,
    config: Option<bool>,
    music: Option<bool>,
    moderation: Option<bool>,
    utility: Option<bool>,
    fun: Option<bool>,
}

impl From<GuildModulesRow> for GuildModules {
    fn from(row: GuildModulesRow) -> Self {
        GuildModules {
            id: GuildBotId::new(GuildId::new(row.guild_id), BotId::new(row.bot_id)),
            admin: row.admin,
            info: row.info,
            config: row.config,
            music: row.music,
            moderation: row.moderation,
            utility: row.utility,
            fun: row.fun,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PgGuildModulesRepo {
    pool: DatabasePool,
}

impl PgGuildModulesRepo {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntityRepo<GuildModules> for PgGuildModulesRepo {
    async fn fetch(&self, key: &GuildBotId) -> Result<GuildModules, DatabaseError> {
        debug!(id = %key, "fetching guild modules");
        let row = sqlx::query_as::<_, GuildModulesRow>(
            r#"
            SELECT guild_id, bot_id, admin, info, config, music, moderation, utility, fun
            FROM guild_modules
            WHERE guild_id = $1 AND bot_id = $2
            "#,
        )
        .bind(key.guild.get())
        .bind(key.bot.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row
            .map(GuildModules::from)
            .unwrap_or_else(|| GuildModules::default_for(*key)))
    }

    async fn merge(&self, entity: GuildModules) -> Result<GuildModules, DatabaseError> {
        let row = sqlx::query_as::<_, GuildModulesRow>(
            r#"
            INSERT INTO guild_modules
                (guild_id, bot_id, admin, info, config, music, moderation, utility, fun)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (guild_id, bot_id) DO UPDATE
                SET admin = EXCLUDED.admin,
                    info = EXCLUDED.info,
                    config = EXCLUDED.config,
                    music = EXCLUDED.music,
                    moderation = EXCLUDED.moderation,
                    utility = EXCLUDED.utility,
                    fun = EXCLUDED.fun
            RETURNING guild_id, bot_id, admin, info, config, music, moderation, utility, fun
            "#,
        )
        .bind(entity.id.guild.get())
        .bind(entity.id.bot.get())
        .bind(entity.admin)
        .bind(entity.info)
        .bind(entity.config)
        .bind(entity.music)
        .bind(entity.moderation)
        .bind(entity.utility)
        .bind(entity.fun)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn delete(&self, key: &GuildBotId) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM guild_modules WHERE guild_id = $1 AND bot_id = $2")
            .bind(key.guild.get())
            .bind(key.bot.get())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
