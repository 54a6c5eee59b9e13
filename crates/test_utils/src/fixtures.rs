//! Predictable test data
//!
//! Fixed ids and pre-built entities so tests read as scenarios rather than
//! setup. Values are arbitrary but stable; assertions may rely on them.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

use guild_kernel::{
    BlacklistEntry, BotId, GuildBotId, GuildConfig, GuildId, GuildPermissions, Prefix,
    SearchResult, SearchResultId, Storable,
};

/// Fixed identifiers used across the suites.
pub struct IdFixtures;

impl IdFixtures {
    pub fn guild() -> GuildId {
        GuildId::new(174820236481134592)
    }

    /// A second guild, for isolation assertions.
    pub fn other_guild() -> GuildId {
        GuildId::new(125227483518861312)
    }

    pub fn bot() -> BotId {
        BotId::new(184405311681986560)
    }

    pub fn guild_bot() -> GuildBotId {
        GuildBotId::new(Self::guild(), Self::bot())
    }

    pub fn user() -> i64 {
        81011298891993088
    }
}

/// Fixed timestamps.
pub struct TimeFixtures;

impl TimeFixtures {
    /// A stable instant well in the past.
    pub fn epoch_2020() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
    }
}

/// Pre-built entities.
pub struct EntityFixtures;

impl EntityFixtures {
    pub fn guild_config() -> GuildConfig {
        GuildConfig::default_for(IdFixtures::guild_bot())
            .with_track_announce(true)
            .with_language("de_DE")
    }

    pub fn permissions() -> GuildPermissions {
        GuildPermissions::default_for(IdFixtures::guild_bot())
            .with_admin_ids(vec![IdFixtures::user()])
    }

    pub fn prefix(raw: &str) -> Prefix {
        Prefix::default_for(IdFixtures::guild_bot()).with_prefix(raw)
    }

    pub fn blacklist_entry() -> BlacklistEntry {
        BlacklistEntry::default_for(IdFixtures::user()).with_level(1)
    }
}

/// Pre-built cache entries.
pub struct SearchFixtures;

impl SearchFixtures {
    pub fn id() -> SearchResultId {
        SearchResultId::new("youtube", "darude sandstorm")
    }

    pub fn result() -> SearchResult {
        SearchResult::new(
            Self::id(),
            json!({"tracks": [{"title": "Darude - Sandstorm", "duration": 225000}]}),
        )
    }

    /// A result whose cache timestamp lies `age_millis` in the past.
    pub fn aged_result(age_millis: i64) -> SearchResult {
        Self::result().with_cached_at(Utc::now() - chrono::Duration::milliseconds(age_millis))
    }
}
