//! Proptest strategies over entity values

use proptest::prelude::*;

use guild_kernel::{BotId, GuildBotId, GuildConfig, GuildId, Module, Prefix, Storable};

/// Positive snowflake-shaped ids.
pub fn snowflake_strategy() -> impl Strategy<Value = i64> {
    1i64..=i64::MAX
}

pub fn guild_bot_id_strategy() -> impl Strategy<Value = GuildBotId> {
    (snowflake_strategy(), snowflake_strategy())
        .prop_map(|(guild, bot)| GuildBotId::new(GuildId::new(guild), BotId::new(bot)))
}

/// Printable-ASCII prefix overrides, one to eight characters.
pub fn prefix_strategy() -> impl Strategy<Value = Prefix> {
    (guild_bot_id_strategy(), "[!-~]{1,8}")
        .prop_map(|(id, raw)| Prefix::default_for(id).with_prefix(raw))
}

pub fn module_strategy() -> impl Strategy<Value = Module> {
    prop_oneof![
        Just(Module::Admin),
        Just(Module::Info),
        Just(Module::Config),
        Just(Module::Music),
        Just(Module::Moderation),
        Just(Module::Utility),
        Just(Module::Fun),
    ]
}

/// Guild configs with arbitrary toggles and one of a few locales.
pub fn guild_config_strategy() -> impl Strategy<Value = GuildConfig> {
    (
        guild_bot_id_strategy(),
        any::<bool>(),
        any::<bool>(),
        prop_oneof![
            Just("en_US".to_string()),
            Just("de_DE".to_string()),
            Just("fr_FR".to_string()),
            Just("pt_BR".to_string()),
        ],
    )
        .prop_map(|(id, announce, resume, lang)| {
            GuildConfig::default_for(id)
                .with_track_announce(announce)
                .with_auto_resume(resume)
                .with_language(lang)
        })
}
