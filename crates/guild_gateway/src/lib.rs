//! Entity gateway for guildstore
//!
//! The gateway is the only persistence surface the rest of the application
//! sees. It owns one repository per entity kind plus the optional search
//! cache store, translates every backend failure into the single opaque
//! [`GatewayError`], and provides the fetch→transform→merge protocol for
//! atomic-looking updates of per-guild configuration.

pub mod error;
pub mod gateway;

pub use error::GatewayError;
pub use gateway::EntityGateway;
