//! Strongly-typed identifiers for persisted entities
//!
//! Chat platforms hand out 64-bit snowflake ids for guilds, users and bot
//! accounts. Newtype wrappers keep the different id spaces from being mixed
//! up, and the composite [`GuildBotId`] addresses entities that are scoped to
//! a (guild, bot) pair — the same guild can be served by more than one bot
//! sharing a database.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_snowflake {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Returns the raw snowflake value
            pub const fn get(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> i64 {
                id.0
            }
        }
    };
}

define_snowflake!(GuildId);
define_snowflake!(BotId);

/// Composite key for guild-scoped entities.
///
/// Guild settings belong to a (guild, bot) pair rather than the guild alone,
/// so that several bot accounts can share one database without trampling each
/// other's configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GuildBotId {
    pub guild: GuildId,
    pub bot: BotId,
}

impl GuildBotId {
    pub const fn new(guild: GuildId, bot: BotId) -> Self {
        Self { guild, bot }
    }
}

impl fmt::Display for GuildBotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.guild, self.bot)
    }
}

/// Composite identity of a cached search: which provider was asked, and for
/// what. Terms are compared verbatim; normalization is the caller's business.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchResultId {
    pub provider: String,
    pub query: String,
}

impl SearchResultId {
    pub fn new(provider: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            query: query.into(),
        }
    }
}

impl fmt::Display for SearchResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.provider, self.query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snowflake_roundtrip() {
        let id = GuildId::new(174820236481134592);
        assert_eq!(id.get(), 174820236481134592);
        assert_eq!(i64::from(id), 174820236481134592);
        assert_eq!(id, GuildId::from(174820236481134592));
    }

    #[test]
    fn test_guild_bot_id_display() {
        let id = GuildBotId::new(GuildId::new(42), BotId::new(7));
        assert_eq!(id.to_string(), "42:7");
    }

    #[test]
    fn test_distinct_id_spaces_do_not_compare() {
        // GuildId and BotId are different types; this is a compile-time
        // property, the test just documents the intent.
        let guild = GuildId::new(1);
        let bot = BotId::new(1);
        assert_eq!(guild.get(), bot.get());
    }

    #[test]
    fn test_search_result_id_is_verbatim() {
        let a = SearchResultId::new("youtube", "never gonna give you up");
        let b = SearchResultId::new("youtube", "Never Gonna Give You Up");
        assert_ne!(a, b);
    }
}
