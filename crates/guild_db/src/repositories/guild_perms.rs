//! Postgres repository for guild permission lists

use async_trait::async_trait;
use sqlx::FromRow;
use tracing::debug;

use guild_kernel::{BotId, GuildBotId, GuildId, GuildPermissions, Storable};

use crate::error::DatabaseError;
use crate::pool::DatabasePool;

use super::EntityRepo;

#[derive(Debug, FromRow)]
struct GuildPermsRow {
    guild_id: i64,
    bot_id: i64,
    admin_ids: Vec<i64>,
    dj_ids: Vec<i64>,
    user_ids: Vec<i64>,
}

impl From<GuildPermsRow> for GuildPermissions {
    fn from(row: GuildPermsRow) -> Self {
        GuildPermissions {
            id: GuildBotId::new(GuildId::new(row.guild_id), BotId::new(row.bot_id)),
            admin_ids: row.admin_ids,
            dj_ids: row.dj_ids,
            user_ids: row.user_ids,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PgGuildPermsRepo {
    pool: DatabasePool,
}

impl PgGuildPermsRepo {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntityRepo<GuildPermissions> for PgGuildPermsRepo {
    async fn fetch(&self, key: &GuildBotId) -> Result<GuildPermissions, DatabaseError> {
        debug!(id = %key, "fetching guild permissions");
        let row = sqlx::query_as::<_, GuildPermsRow>(
            r#"
            SELECT guild_id, bot_id, admin_ids, dj_ids, user_ids
            FROM guild_permissions
            WHERE guild_id = $1 AND bot_id = $2
            "#,
        )
        .bind(key.guild.get())
        .bind(key.bot.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row
            .map(GuildPermissions::from)
            .unwrap_or_else(|| GuildPermissions::default_for(*key)))
    }

    async fn merge(&self, entity: GuildPermissions) -> Result<GuildPermissions, DatabaseError> {
        let row = sqlx::query_as::<_, GuildPermsRow>(
            r#"
            INSERT INTO guild_permissions (guild_id, bot_id, admin_ids, dj_ids, user_ids)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (guild_id, bot_id) DO UPDATE
                SET admin_ids = EXCLUDED.admin_ids,
                    dj_ids = EXCLUDED.dj_ids,
                    user_ids = EXCLUDED.user_ids
            RETURNING guild_id, bot_id, admin_ids, dj_ids, user_ids
            "#,
        )
        .bind(entity.id.guild.get())
        .bind(entity.id.bot.get())
        .bind(&entity.admin_ids)
        .bind(&entity.dj_ids)
        .bind(&entity.user_ids)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn delete(&self, key: &GuildBotId) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM guild_permissions WHERE guild_id = $1 AND bot_id = $2")
            .bind(key.guild.get())
            .bind(key.bot.get())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
