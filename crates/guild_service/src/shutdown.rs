//! Shutdown contract
//!
//! The only externally observable startup contract besides "it runs" is the
//! exit code: [`EXIT_DATABASE_UNAVAILABLE`] signals that required database
//! connectivity could not be established or sustained.

use tracing::info;

/// Orderly shutdown.
pub const EXIT_SUCCESS: i32 = 0;

/// Required database connectivity could not be established at startup, or
/// was lost for good at runtime.
pub const EXIT_DATABASE_UNAVAILABLE: i32 = 2;

/// Completes when SIGINT (Ctrl+C) or SIGTERM arrives.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("received SIGTERM, shutting down");
        }
    }
}
