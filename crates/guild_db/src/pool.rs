//! Connection pool configuration and creation
//!
//! Each database (primary and cache) gets one [`PgPool`], created once at
//! startup by the supervisor and cloned into every repository of that
//! database. The pool handle is cheap to clone and internally shared.

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::debug;

use crate::error::DatabaseError;

/// Alias for the PostgreSQL connection pool used throughout the workspace.
pub type DatabasePool = PgPool;

/// Pool settings for one database.
///
/// ```rust
/// use guild_db::DatabaseConfig;
/// use std::time::Duration;
///
/// let config = DatabaseConfig::new("postgres://localhost/guildstore")
///     .max_connections(16)
///     .acquire_timeout(Duration::from_secs(10));
/// ```
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection string
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// How long an acquire may wait for a free connection
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            acquire_timeout: Duration::from_secs(30),
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }
}

/// Creates a connection pool and verifies it with a liveness ping.
///
/// A pool handle on its own proves little: sqlx connects lazily. The ping
/// forces one real round trip so that callers holding a returned pool know
/// the database answered at least once.
///
/// # Errors
///
/// Returns [`DatabaseError::ConnectionFailed`] if the pool cannot be created
/// or the ping does not come back.
pub async fn create_pool(config: &DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    debug!(
        max_connections = config.max_connections,
        "creating database pool"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.url)
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

    ping(&pool).await?;
    Ok(pool)
}

/// One `SELECT 1` round trip against the pool.
pub async fn ping(pool: &DatabasePool) -> Result<(), DatabaseError> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;
    Ok(())
}
