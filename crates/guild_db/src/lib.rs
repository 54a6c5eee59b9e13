//! Database infrastructure for guildstore
//!
//! This crate owns everything that touches PostgreSQL:
//!
//! - [`pool`]: connection pool configuration and creation
//! - [`supervisor`]: bounded-retry connection establishment and ownership of
//!   the primary and optional cache pool
//! - [`watchdog`]: the background liveness probe for the primary pool
//! - [`repositories`]: the uniform fetch/merge/delete contract and its
//!   Postgres and in-memory implementations
//!
//! Application code never uses repositories directly; the gateway crate
//! wraps them behind its error-translation boundary.

pub mod error;
pub mod pool;
pub mod repositories;
pub mod schema;
pub mod supervisor;
pub mod watchdog;

pub use error::DatabaseError;
pub use pool::{create_pool, DatabaseConfig, DatabasePool};
pub use supervisor::{ConnectionSupervisor, RetryPolicy};
pub use watchdog::{Liveness, LivenessProbe, WatchdogConfig};
