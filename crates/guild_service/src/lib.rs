//! Service wiring for guildstore
//!
//! Everything between "the process started" and "the gateway is usable":
//! configuration loading, the startup connection sequence, and the shutdown
//! contract (signals and exit codes). The binary in `src/bin/guildstore.rs`
//! is a thin shell over these modules.

pub mod bootstrap;
pub mod config;
pub mod shutdown;

pub use bootstrap::{bootstrap, App};
pub use config::ServiceConfig;
pub use shutdown::{shutdown_signal, EXIT_DATABASE_UNAVAILABLE, EXIT_SUCCESS};
