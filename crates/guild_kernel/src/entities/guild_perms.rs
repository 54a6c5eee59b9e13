//! Per-guild permission lists

use serde::{Deserialize, Serialize};

use super::Storable;
use crate::identifiers::GuildBotId;

/// Role and member ids granted each permission tier.
///
/// The user tier defaults to the guild's everyone-role, whose snowflake
/// equals the guild id, so a fresh guild is usable without configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildPermissions {
    pub id: GuildBotId,
    /// May administrate the bot in this guild.
    pub admin_ids: Vec<i64>,
    /// May control playback.
    pub dj_ids: Vec<i64>,
    /// May invoke regular commands.
    pub user_ids: Vec<i64>,
}

impl GuildPermissions {
    pub fn with_admin_ids(mut self, ids: Vec<i64>) -> Self {
        self.admin_ids = ids;
        self
    }

    pub fn with_dj_ids(mut self, ids: Vec<i64>) -> Self {
        self.dj_ids = ids;
        self
    }

    pub fn with_user_ids(mut self, ids: Vec<i64>) -> Self {
        self.user_ids = ids;
        self
    }
}

impl Storable for GuildPermissions {
    type Key = GuildBotId;

    fn key(&self) -> GuildBotId {
        self.id
    }

    fn default_for(key: GuildBotId) -> Self {
        Self {
            id: key,
            admin_ids: Vec::new(),
            dj_ids: Vec::new(),
            user_ids: vec![key.guild.get()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifiers::{BotId, GuildId};

    #[test]
    fn test_default_grants_everyone_user_tier() {
        let key = GuildBotId::new(GuildId::new(99), BotId::new(3));
        let perms = GuildPermissions::default_for(key);
        assert_eq!(perms.user_ids, vec![99]);
        assert!(perms.admin_ids.is_empty());
        assert!(perms.dj_ids.is_empty());
    }
}
