//! Shipped DDL for both databases
//!
//! The schema is idempotent (`CREATE TABLE IF NOT EXISTS`) and applied by the
//! bootstrap sequence after the pools come up, so a fresh deployment needs no
//! external migration step.

use crate::error::DatabaseError;
use crate::pool::DatabasePool;

/// Tables of the primary database.
pub const MAIN: &str = include_str!("schema_main.sql");

/// Tables of the cache database.
pub const CACHE: &str = include_str!("schema_cache.sql");

/// Applies the primary-database DDL.
pub async fn apply_main(pool: &DatabasePool) -> Result<(), DatabaseError> {
    sqlx::raw_sql(MAIN).execute(pool).await?;
    Ok(())
}

/// Applies the cache-database DDL.
pub async fn apply_cache(pool: &DatabasePool) -> Result<(), DatabaseError> {
    sqlx::raw_sql(CACHE).execute(pool).await?;
    Ok(())
}
