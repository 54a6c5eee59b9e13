//! The startup sequence
//!
//! Executed once, before anything else may touch persistence:
//!
//! 1. connect the primary database (bounded retry)
//! 2. apply the primary schema
//! 3. start the liveness watchdog
//! 4. connect the cache database if configured (bounded retry, fatal on
//!    exhaustion like the primary)
//! 5. construct the entity gateway over both pools
//!
//! Any error out of here means the process must not continue; the binary
//! maps it to [`crate::shutdown::EXIT_DATABASE_UNAVAILABLE`].

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use guild_db::{schema, ConnectionSupervisor, DatabaseError, Liveness};
use guild_gateway::EntityGateway;

use crate::config::ServiceConfig;

/// Everything the rest of the application needs after startup.
pub struct App {
    pub gateway: Arc<EntityGateway>,
    pub supervisor: ConnectionSupervisor,
    /// Watchdog status flag; [`Liveness::Lost`] means the process should
    /// exit with the connectivity exit code.
    pub liveness: watch::Receiver<Liveness>,
}

/// Runs the startup sequence.
pub async fn bootstrap(config: &ServiceConfig) -> Result<App, DatabaseError> {
    if config.bot_id == 0 {
        warn!("GUILDSTORE_BOT_ID is not set, guild-scoped entities will key on bot id 0");
    }

    let retry = config.retry_policy();

    let mut supervisor = ConnectionSupervisor::connect_primary(&config.primary_db(), &retry).await?;
    schema::apply_main(supervisor.primary()).await?;

    let liveness = supervisor.start_watchdog(config.watchdog());

    match config.cache_db() {
        Some(cache_config) => {
            supervisor.connect_cache(&cache_config, &retry).await?;
            schema::apply_cache(supervisor.cache().expect("cache pool just connected")).await?;
        }
        None => info!("no cache database configured, result cache tier disabled"),
    }

    let gateway = Arc::new(EntityGateway::postgres(
        config.bot_id(),
        supervisor.primary().clone(),
        supervisor.cache().cloned(),
    ));

    info!(
        cache = gateway.has_cache(),
        "entity gateway constructed, persistence layer ready"
    );

    Ok(App {
        gateway,
        supervisor,
        liveness,
    })
}
