//! Service configuration
//!
//! Loaded from `GUILDSTORE_*` environment variables (a `.env` file is picked
//! up by the binary first). Every knob has a default so a bare development
//! environment comes up against a local database.

use std::time::Duration;

use serde::Deserialize;

use guild_db::{DatabaseConfig, RetryPolicy, WatchdogConfig};
use guild_kernel::BotId;

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Primary database connection string.
    #[serde(default = "defaults::database_url")]
    pub database_url: String,

    /// Cache database connection string; unset disables the result cache
    /// tier entirely.
    #[serde(default)]
    pub cache_database_url: Option<String>,

    /// Pool size used for both databases.
    #[serde(default = "defaults::db_pool_size")]
    pub db_pool_size: u32,

    /// Startup connection attempts per database.
    #[serde(default = "defaults::db_connect_attempts")]
    pub db_connect_attempts: u32,

    /// Pause between failed startup connection attempts, in seconds.
    #[serde(default = "defaults::db_connect_backoff_secs")]
    pub db_connect_backoff_secs: u64,

    /// Pause between watchdog liveness probes, in seconds.
    #[serde(default = "defaults::watchdog_interval_secs")]
    pub watchdog_interval_secs: u64,

    /// Consecutive failed probes before connectivity is declared lost.
    #[serde(default = "defaults::watchdog_failure_threshold")]
    pub watchdog_failure_threshold: u32,

    /// Snowflake of the bot account this process serves.
    #[serde(default)]
    pub bot_id: i64,

    /// Log filter, e.g. "info" or "guild_db=debug,info".
    #[serde(default = "defaults::log_level")]
    pub log_level: String,
}

mod defaults {
    pub fn database_url() -> String {
        "postgres://localhost/guildstore".to_string()
    }

    pub fn db_pool_size() -> u32 {
        10
    }

    pub fn db_connect_attempts() -> u32 {
        10
    }

    pub fn db_connect_backoff_secs() -> u64 {
        6
    }

    pub fn watchdog_interval_secs() -> u64 {
        10
    }

    pub fn watchdog_failure_threshold() -> u32 {
        30
    }

    pub fn log_level() -> String {
        "info".to_string()
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            database_url: defaults::database_url(),
            cache_database_url: None,
            db_pool_size: defaults::db_pool_size(),
            db_connect_attempts: defaults::db_connect_attempts(),
            db_connect_backoff_secs: defaults::db_connect_backoff_secs(),
            watchdog_interval_secs: defaults::watchdog_interval_secs(),
            watchdog_failure_threshold: defaults::watchdog_failure_threshold(),
            bot_id: 0,
            log_level: defaults::log_level(),
        }
    }
}

impl ServiceConfig {
    /// Loads configuration from `GUILDSTORE_*` environment variables.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("GUILDSTORE").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn bot_id(&self) -> BotId {
        BotId::new(self.bot_id)
    }

    pub fn primary_db(&self) -> DatabaseConfig {
        DatabaseConfig::new(&self.database_url).max_connections(self.db_pool_size)
    }

    pub fn cache_db(&self) -> Option<DatabaseConfig> {
        self.cache_database_url
            .as_deref()
            .map(|url| DatabaseConfig::new(url).max_connections(self.db_pool_size))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.db_connect_attempts,
            backoff: Duration::from_secs(self.db_connect_backoff_secs),
        }
    }

    pub fn watchdog(&self) -> WatchdogConfig {
        WatchdogConfig {
            interval: Duration::from_secs(self.watchdog_interval_secs),
            failure_threshold: self.watchdog_failure_threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_the_deployment_tuning() {
        let config = ServiceConfig::default();
        let retry = config.retry_policy();
        assert_eq!(retry.max_attempts, 10);
        assert_eq!(retry.backoff, Duration::from_secs(6));
        assert!(config.cache_db().is_none());
    }

    #[test]
    fn test_cache_db_derived_from_url() {
        let config = ServiceConfig {
            cache_database_url: Some("postgres://localhost/guildstore_cache".to_string()),
            ..ServiceConfig::default()
        };
        let cache = config.cache_db().expect("cache configured");
        assert_eq!(cache.url, "postgres://localhost/guildstore_cache");
        assert_eq!(cache.max_connections, 10);
    }
}
