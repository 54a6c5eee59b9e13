//! Persisted entity kinds
//!
//! Every entity here is a plain value: repositories hand out owned copies,
//! and a "transform" builds a new value from an old one with the chainable
//! `with_*` methods before handing it back for persistence. Nothing is shared
//! by reference after it leaves the persistence layer.

pub mod blacklist;
pub mod guild_config;
pub mod guild_data;
pub mod guild_modules;
pub mod guild_perms;
pub mod prefix;
pub mod search_result;

pub use blacklist::BlacklistEntry;
pub use guild_config::GuildConfig;
pub use guild_data::GuildData;
pub use guild_modules::{GuildModules, Module};
pub use guild_perms::GuildPermissions;
pub use prefix::{Prefix, DEFAULT_PREFIX};
pub use search_result::SearchResult;

use std::hash::Hash;

/// Contract between entity kinds and the repositories that persist them.
///
/// `fetch` on a key that was never written must return a usable value, so
/// each kind knows how to construct its own default for a given key. Absence
/// is not an error anywhere in the persistence layer.
pub trait Storable: Clone + Send + Sync + 'static {
    /// Key type this entity is addressed by.
    type Key: Clone + Eq + Hash + Send + Sync + 'static;

    /// The key this snapshot belongs to.
    fn key(&self) -> Self::Key;

    /// A fresh default-initialized entity for `key`, used when nothing is
    /// stored yet.
    fn default_for(key: Self::Key) -> Self;
}
