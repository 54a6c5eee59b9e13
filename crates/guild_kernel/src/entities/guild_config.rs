//! Per-guild behavior toggles

use serde::{Deserialize, Serialize};

use super::Storable;
use crate::identifiers::GuildBotId;

/// User-facing settings of a guild: playback announcements, resume behavior
/// and the language the bot answers in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildConfig {
    pub id: GuildBotId,
    /// Announce the track now playing in the text channel.
    pub track_announce: bool,
    /// Resume playback after a restart if a queue was active.
    pub auto_resume: bool,
    /// BCP-ish locale tag, e.g. "en_US".
    pub language: String,
}

impl GuildConfig {
    pub fn with_track_announce(mut self, on: bool) -> Self {
        self.track_announce = on;
        self
    }

    pub fn with_auto_resume(mut self, on: bool) -> Self {
        self.auto_resume = on;
        self
    }

    pub fn with_language(mut self, lang: impl Into<String>) -> Self {
        self.language = lang.into();
        self
    }
}

impl Storable for GuildConfig {
    type Key = GuildBotId;

    fn key(&self) -> GuildBotId {
        self.id
    }

    fn default_for(key: GuildBotId) -> Self {
        Self {
            id: key,
            track_announce: false,
            auto_resume: false,
            language: "en_US".to_string(),
        }
    }
}
