//! Per-guild command module toggles
//!
//! Each module carries an optional override; an unset flag falls back to the
//! module's built-in default. Storing the override rather than the resolved
//! value lets a later change of built-in defaults reach guilds that never
//! touched the setting.

use serde::{Deserialize, Serialize};

use super::Storable;
use crate::identifiers::GuildBotId;

/// Command modules a guild can switch on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Module {
    Admin,
    Info,
    Config,
    Music,
    Moderation,
    Utility,
    Fun,
}

impl Module {
    /// All modules, in display order.
    pub const ALL: [Module; 7] = [
        Module::Admin,
        Module::Info,
        Module::Config,
        Module::Music,
        Module::Moderation,
        Module::Utility,
        Module::Fun,
    ];

    /// Whether the module is on for guilds that never configured it.
    pub const fn enabled_by_default(&self) -> bool {
        // every module ships enabled; guilds opt out
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildModules {
    pub id: GuildBotId,
    pub admin: Option<bool>,
    pub info: Option<bool>,
    pub config: Option<bool>,
    pub music: Option<bool>,
    pub moderation: Option<bool>,
    pub utility: Option<bool>,
    pub fun: Option<bool>,
}

impl GuildModules {
    /// The stored override for `module`, if any.
    pub fn flag(&self, module: Module) -> Option<bool> {
        match module {
            Module::Admin => self.admin,
            Module::Info => self.info,
            Module::Config => self.config,
            Module::Music => self.music,
            Module::Moderation => self.moderation,
            Module::Utility => self.utility,
            Module::Fun => self.fun,
        }
    }

    /// Resolves `module` against its built-in default.
    pub fn is_enabled(&self, module: Module) -> bool {
        self.flag(module).unwrap_or(module.enabled_by_default())
    }

    /// Returns a copy with the override for `module` set; `None` clears the
    /// override back to the built-in default.
    pub fn with_module(mut self, module: Module, flag: Option<bool>) -> Self {
        let slot = match module {
            Module::Admin => &mut self.admin,
            Module::Info => &mut self.info,
            Module::Config => &mut self.config,
            Module::Music => &mut self.music,
            Module::Moderation => &mut self.moderation,
            Module::Utility => &mut self.utility,
            Module::Fun => &mut self.fun,
        };
        *slot = flag;
        self
    }
}

impl Storable for GuildModules {
    type Key = GuildBotId;

    fn key(&self) -> GuildBotId {
        self.id
    }

    fn default_for(key: GuildBotId) -> Self {
        Self {
            id: key,
            admin: None,
            info: None,
            config: None,
            music: None,
            moderation: None,
            utility: None,
            fun: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifiers::{BotId, GuildId};

    fn key() -> GuildBotId {
        GuildBotId::new(GuildId::new(1), BotId::new(2))
    }

    #[test]
    fn test_unset_flag_resolves_to_default() {
        let modules = GuildModules::default_for(key());
        for module in Module::ALL {
            assert!(modules.is_enabled(module));
        }
    }

    #[test]
    fn test_override_wins_over_default() {
        let modules = GuildModules::default_for(key()).with_module(Module::Fun, Some(false));
        assert!(!modules.is_enabled(Module::Fun));
        assert!(modules.is_enabled(Module::Music));
    }

    #[test]
    fn test_clearing_override_restores_default() {
        let modules = GuildModules::default_for(key())
            .with_module(Module::Music, Some(false))
            .with_module(Module::Music, None);
        assert!(modules.is_enabled(Module::Music));
        assert_eq!(modules.flag(Module::Music), None);
    }
}
