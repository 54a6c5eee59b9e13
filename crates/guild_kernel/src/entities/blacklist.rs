//! Blacklist entries for rate-limit abusers
//!
//! Keyed by the offending snowflake directly (a user or a whole guild). The
//! escalation level starts at -1, meaning the id has never been blacklisted;
//! each ratelimit breach bumps the strike count and eventually the level.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Storable;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlacklistEntry {
    /// Snowflake of the blacklisted user or guild.
    pub id: i64,
    /// Current escalation level; -1 = never blacklisted.
    pub level: i32,
    /// Ratelimit breaches counted towards the next level.
    pub strike_count: u32,
    /// When the most recent strike was recorded.
    pub last_strike: Option<DateTime<Utc>>,
}

impl BlacklistEntry {
    pub fn with_level(mut self, level: i32) -> Self {
        self.level = level;
        self
    }

    /// Records a strike at `at`, bumping the counter.
    pub fn with_strike(mut self, at: DateTime<Utc>) -> Self {
        self.strike_count += 1;
        self.last_strike = Some(at);
        self
    }

    /// Resets strikes without touching the level.
    pub fn with_strikes_cleared(mut self) -> Self {
        self.strike_count = 0;
        self.last_strike = None;
        self
    }

    pub fn is_blacklisted(&self) -> bool {
        self.level >= 0
    }
}

impl Storable for BlacklistEntry {
    type Key = i64;

    fn key(&self) -> i64 {
        self.id
    }

    fn default_for(key: i64) -> Self {
        Self {
            id: key,
            level: -1,
            strike_count: 0,
            last_strike: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_not_blacklisted() {
        let entry = BlacklistEntry::default_for(123);
        assert_eq!(entry.level, -1);
        assert!(!entry.is_blacklisted());
        assert_eq!(entry.strike_count, 0);
    }

    #[test]
    fn test_strike_bumps_counter() {
        let now = Utc::now();
        let entry = BlacklistEntry::default_for(123).with_strike(now).with_strike(now);
        assert_eq!(entry.strike_count, 2);
        assert_eq!(entry.last_strike, Some(now));
    }
}
