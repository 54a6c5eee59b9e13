//! guildstore - supervised persistence gateway for a chat-bot service
//!
//! # Usage
//!
//! ```bash
//! # Run against a local database
//! cargo run --bin guildstore
//!
//! # Full configuration
//! GUILDSTORE_DATABASE_URL=postgres://... \
//! GUILDSTORE_CACHE_DATABASE_URL=postgres://... \
//! GUILDSTORE_BOT_ID=184405311681986560 \
//! cargo run --bin guildstore
//! ```
//!
//! # Environment Variables
//!
//! * `GUILDSTORE_DATABASE_URL` - primary database (default: postgres://localhost/guildstore)
//! * `GUILDSTORE_CACHE_DATABASE_URL` - cache database; unset disables the cache tier
//! * `GUILDSTORE_DB_POOL_SIZE` - pool size per database (default: 10)
//! * `GUILDSTORE_DB_CONNECT_ATTEMPTS` - startup connection attempts (default: 10)
//! * `GUILDSTORE_DB_CONNECT_BACKOFF_SECS` - pause between attempts (default: 6)
//! * `GUILDSTORE_WATCHDOG_INTERVAL_SECS` - liveness probe interval (default: 10)
//! * `GUILDSTORE_WATCHDOG_FAILURE_THRESHOLD` - probes before giving up (default: 30)
//! * `GUILDSTORE_BOT_ID` - snowflake of the bot account this process serves
//! * `GUILDSTORE_LOG_LEVEL` - log filter (default: info)

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use guild_db::Liveness;
use guild_service::{bootstrap, shutdown_signal, ServiceConfig, EXIT_DATABASE_UNAVAILABLE};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = ServiceConfig::from_env()?;
    init_tracing(&config.log_level);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "starting guildstore persistence gateway"
    );

    let app = match bootstrap(&config).await {
        Ok(app) => app,
        Err(e) => {
            error!(error = %e, "could not establish required database connectivity, exiting");
            std::process::exit(EXIT_DATABASE_UNAVAILABLE);
        }
    };

    tokio::select! {
        _ = shutdown_signal() => {}
        _ = connectivity_lost(app.liveness.clone()) => {
            error!("database connectivity lost and not recovered, exiting");
            std::process::exit(EXIT_DATABASE_UNAVAILABLE);
        }
    }

    app.supervisor.close().await;
    info!("guildstore shut down");
    Ok(())
}

/// Resolves once the watchdog declares the primary connection lost. Pends
/// forever if the status channel goes away without that verdict.
async fn connectivity_lost(mut liveness: tokio::sync::watch::Receiver<Liveness>) {
    match liveness.wait_for(|l| *l == Liveness::Lost).await {
        Ok(_) => {}
        Err(_) => std::future::pending().await,
    }
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}
