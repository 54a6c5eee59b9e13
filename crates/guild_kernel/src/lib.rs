//! Core types for the guildstore persistence layer
//!
//! This crate defines the entity kinds persisted for each guild a bot is a
//! member of, the strongly-typed identifiers used to address them, and the
//! [`Storable`] contract that repositories are generic over.
//!
//! Entities are immutable value snapshots: mutation goes through chainable
//! `with_*` methods that consume the old value and return a new one, which a
//! caller hands back to the gateway for persistence.

pub mod entities;
pub mod identifiers;

pub use entities::{
    BlacklistEntry, GuildConfig, GuildData, GuildModules, GuildPermissions, Module, Prefix,
    SearchResult, Storable, DEFAULT_PREFIX,
};
pub use identifiers::{BotId, GuildBotId, GuildId, SearchResultId};
