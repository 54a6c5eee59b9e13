//! Bookkeeping data the bot records about a guild

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Storable;
use crate::identifiers::GuildBotId;

/// Facts the bot remembers about a guild that are not user-facing settings,
/// currently just whether the one-time greeting went out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildData {
    pub id: GuildBotId,
    /// When the greeting message was posted, if ever.
    pub hello_sent_at: Option<DateTime<Utc>>,
}

impl GuildData {
    pub fn with_hello_sent(mut self, at: DateTime<Utc>) -> Self {
        self.hello_sent_at = Some(at);
        self
    }

    pub fn hello_sent(&self) -> bool {
        self.hello_sent_at.is_some()
    }
}

impl Storable for GuildData {
    type Key = GuildBotId;

    fn key(&self) -> GuildBotId {
        self.id
    }

    fn default_for(key: GuildBotId) -> Self {
        Self {
            id: key,
            hello_sent_at: None,
        }
    }
}
