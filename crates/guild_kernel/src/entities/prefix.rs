//! Per-guild command prefix

use serde::{Deserialize, Serialize};

use super::Storable;
use crate::identifiers::GuildBotId;

/// Prefix used when no guild-specific one is stored.
pub const DEFAULT_PREFIX: &str = "!";

/// Command prefix mapping for a (guild, bot) pair.
///
/// The stored value is the raw override; [`Prefix::effective`] resolves an
/// unset override to [`DEFAULT_PREFIX`]. Lookup paths that only need the raw
/// value (to decide whether a message is addressed to the bot at all) go
/// through the gateway's prefix read instead of fetching the whole entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prefix {
    pub id: GuildBotId,
    pub prefix: Option<String>,
}

impl Prefix {
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_prefix_cleared(mut self) -> Self {
        self.prefix = None;
        self
    }

    /// The prefix commands are matched against, falling back to the default.
    pub fn effective(&self) -> &str {
        self.prefix.as_deref().unwrap_or(DEFAULT_PREFIX)
    }
}

impl Storable for Prefix {
    type Key = GuildBotId;

    fn key(&self) -> GuildBotId {
        self.id
    }

    fn default_for(key: GuildBotId) -> Self {
        Self { id: key, prefix: None }
    }
}
