//! Postgres store for cached search results (cache database)
//!
//! Staleness is enforced in SQL at read time by comparing `cached_at`
//! against a cutoff computed from the caller's maximum age. Stale rows stay
//! in place; the next merge for the same identity overwrites them.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;
use tracing::debug;

use guild_kernel::{SearchResult, SearchResultId};

use crate::error::DatabaseError;
use crate::pool::DatabasePool;

use super::SearchResultStore;

#[derive(Debug, FromRow)]
struct SearchResultRow {
    provider: String,
    query: String,
    cached_at: DateTime<Utc>,
    payload: serde_json::Value,
}

impl From<SearchResultRow> for SearchResult {
    fn from(row: SearchResultRow) -> Self {
        SearchResult {
            id: SearchResultId::new(row.provider, row.query),
            cached_at: row.cached_at,
            payload: row.payload,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PgSearchResultRepo {
    pool: DatabasePool,
}

impl PgSearchResultRepo {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SearchResultStore for PgSearchResultRepo {
    async fn merge(&self, result: SearchResult) -> Result<SearchResult, DatabaseError> {
        let row = sqlx::query_as::<_, SearchResultRow>(
            r#"
            INSERT INTO search_results (provider, query, cached_at, payload)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (provider, query) DO UPDATE
                SET cached_at = EXCLUDED.cached_at,
                    payload = EXCLUDED.payload
            RETURNING provider, query, cached_at, payload
            "#,
        )
        .bind(&result.id.provider)
        .bind(&result.id.query)
        .bind(result.cached_at)
        .bind(&result.payload)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn fetch_max_aged(
        &self,
        id: &SearchResultId,
        max_age_millis: i64,
    ) -> Result<Option<SearchResult>, DatabaseError> {
        debug!(id = %id, max_age_millis, "fetching cached search result");

        let row = if max_age_millis < 0 {
            sqlx::query_as::<_, SearchResultRow>(
                r#"
                SELECT provider, query, cached_at, payload
                FROM search_results
                WHERE provider = $1 AND query = $2
                "#,
            )
            .bind(&id.provider)
            .bind(&id.query)
            .fetch_optional(&self.pool)
            .await?
        } else {
            let cutoff = Utc::now() - Duration::milliseconds(max_age_millis);
            sqlx::query_as::<_, SearchResultRow>(
                r#"
                SELECT provider, query, cached_at, payload
                FROM search_results
                WHERE provider = $1 AND query = $2 AND cached_at >= $3
                "#,
            )
            .bind(&id.provider)
            .bind(&id.query)
            .bind(cutoff)
            .fetch_optional(&self.pool)
            .await?
        };

        Ok(row.map(SearchResult::from))
    }
}
