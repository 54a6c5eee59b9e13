//! Postgres repository for blacklist entries

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::debug;

use guild_kernel::{BlacklistEntry, Storable};

use crate::error::DatabaseError;
use crate::pool::DatabasePool;

use super::EntityRepo;

#[derive(Debug, FromRow)]
struct BlacklistRow {
    id: i64,
    level: i32,
    strike_count: i32,
    last_strike: Option<DateTime<Utc>>,
}

impl From<BlacklistRow> for BlacklistEntry {
    fn from(row: BlacklistRow) -> Self {
        BlacklistEntry {
            id: row.id,
            level: row.level,
            strike_count: row.strike_count.max(0) as u32,
            last_strike: row.last_strike,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PgBlacklistRepo {
    pool: DatabasePool,
}

impl PgBlacklistRepo {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntityRepo<BlacklistEntry> for PgBlacklistRepo {
    async fn fetch(&self, key: &i64) -> Result<BlacklistEntry, DatabaseError> {
        debug!(id = *key, "fetching blacklist entry");
        let row = sqlx::query_as::<_, BlacklistRow>(
            "SELECT id, level, strike_count, last_strike FROM blacklist WHERE id = $1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row
            .map(BlacklistEntry::from)
            .unwrap_or_else(|| BlacklistEntry::default_for(*key)))
    }

    async fn merge(&self, entity: BlacklistEntry) -> Result<BlacklistEntry, DatabaseError> {
        let row = sqlx::query_as::<_, BlacklistRow>(
            r#"
            INSERT INTO blacklist (id, level, strike_count, last_strike)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
                SET level = EXCLUDED.level,
                    strike_count = EXCLUDED.strike_count,
                    last_strike = EXCLUDED.last_strike
            RETURNING id, level, strike_count, last_strike
            "#,
        )
        .bind(entity.id)
        .bind(entity.level)
        .bind(entity.strike_count as i32)
        .bind(entity.last_strike)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn delete(&self, key: &i64) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM blacklist WHERE id = $1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
