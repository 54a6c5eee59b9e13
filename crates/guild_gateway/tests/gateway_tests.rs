//! Behavior tests for the entity gateway, run over the in-memory backend.

use std::sync::Arc;

use guild_gateway::EntityGateway;
use guild_kernel::{
    BlacklistEntry, GuildConfig, Module, SearchResultId, Storable, DEFAULT_PREFIX,
};
use test_utils::{EntityFixtures, FailingStore, IdFixtures, SearchFixtures};

fn gateway() -> EntityGateway {
    EntityGateway::in_memory(IdFixtures::bot(), true)
}

/// Gateway in which every repository call fails.
fn broken_gateway() -> EntityGateway {
    let failing = Arc::new(FailingStore);
    EntityGateway::new(
        IdFixtures::bot(),
        failing.clone(),
        failing.clone(),
        failing.clone(),
        failing.clone(),
        failing.clone(),
        failing.clone(),
        Some(failing as Arc<dyn guild_db::repositories::SearchResultStore>),
    )
}

mod defaults {
    use super::*;

    #[tokio::test]
    async fn test_fetch_on_unwritten_keys_returns_defaults() {
        let gw = gateway();
        let guild = IdFixtures::guild();

        let config = gw.fetch_guild_config(guild).await.unwrap();
        assert_eq!(config, GuildConfig::default_for(IdFixtures::guild_bot()));

        let data = gw.fetch_guild_data(guild).await.unwrap();
        assert!(!data.hello_sent());

        let modules = gw.fetch_guild_modules(guild).await.unwrap();
        assert!(modules.is_enabled(Module::Music));

        let perms = gw.fetch_guild_permissions(guild).await.unwrap();
        assert_eq!(perms.user_ids, vec![guild.get()]);

        let entry = gw.fetch_blacklist_entry(IdFixtures::user()).await.unwrap();
        assert!(!entry.is_blacklisted());
    }

    #[tokio::test]
    async fn test_get_prefix_is_none_until_configured() {
        let gw = gateway();
        assert_eq!(gw.get_prefix(IdFixtures::guild()).await.unwrap(), None);
    }
}

mod transform_protocol {
    use super::*;

    #[tokio::test]
    async fn test_transform_prefix_from_default_to_override() {
        let gw = gateway();
        let guild = IdFixtures::guild();

        // the default entity resolves to "!"
        let before = gw
            .transform_prefix(guild, |p| {
                assert_eq!(p.effective(), DEFAULT_PREFIX);
                p
            })
            .await
            .unwrap();
        assert_eq!(before.effective(), "!");

        let after = gw
            .transform_prefix(guild, |p| p.with_prefix("?"))
            .await
            .unwrap();
        assert_eq!(after.effective(), "?");

        assert_eq!(gw.get_prefix(guild).await.unwrap(), Some("?".to_string()));
    }

    #[tokio::test]
    async fn test_transform_equals_merge_of_transformed_fetch() {
        let gw = gateway();
        let guild = IdFixtures::guild();

        let transformed = gw
            .transform_guild_config(guild, |c| c.with_auto_resume(true))
            .await
            .unwrap();

        let fetched = gw.fetch_guild_config(guild).await.unwrap();
        assert_eq!(transformed, fetched);
        assert!(fetched.auto_resume);
    }

    #[tokio::test]
    async fn test_transform_scopes_to_the_addressed_guild() {
        let gw = gateway();

        gw.transform_guild_config(IdFixtures::guild(), |c| c.with_track_announce(true))
            .await
            .unwrap();

        let other = gw.fetch_guild_config(IdFixtures::other_guild()).await.unwrap();
        assert!(!other.track_announce);
    }

    #[tokio::test]
    async fn test_concurrent_transforms_leave_one_of_two_outcomes() {
        let gw = Arc::new(gateway());
        let guild = IdFixtures::guild();
        let key = IdFixtures::guild_bot();

        let outcome_a = GuildConfig::default_for(key).with_language("de_DE");
        let outcome_b = GuildConfig::default_for(key)
            .with_language("fr_FR")
            .with_track_announce(true);

        let (a, b) = (outcome_a.clone(), outcome_b.clone());
        let (gw_a, gw_b) = (gw.clone(), gw.clone());
        let task_a =
            tokio::spawn(async move { gw_a.transform_guild_config(guild, move |_| a).await });
        let task_b =
            tokio::spawn(async move { gw_b.transform_guild_config(guild, move |_| b).await });

        task_a.await.unwrap().unwrap();
        task_b.await.unwrap().unwrap();

        // the later merge wins; either full value is acceptable, a blend of
        // the two is not
        let stored = gw.fetch_guild_config(guild).await.unwrap();
        assert!(
            stored == outcome_a || stored == outcome_b,
            "stored value is a corrupted blend: {stored:?}"
        );
    }

    #[tokio::test]
    async fn test_module_toggle_via_transform() {
        let gw = gateway();
        let guild = IdFixtures::guild();

        gw.transform_guild_modules(guild, |m| m.with_module(Module::Fun, Some(false)))
            .await
            .unwrap();

        let modules = gw.fetch_guild_modules(guild).await.unwrap();
        assert!(!modules.is_enabled(Module::Fun));
        assert!(modules.is_enabled(Module::Admin));
    }
}

mod blacklist_ops {
    use super::*;

    #[tokio::test]
    async fn test_merge_and_delete_roundtrip() {
        let gw = gateway();
        let entry = EntityFixtures::blacklist_entry();
        let id = entry.id;

        let stored = gw.merge_blacklist_entry(entry).await.unwrap();
        assert!(stored.is_blacklisted());

        gw.delete_blacklist_entry(id).await.unwrap();
        // deleting again is not an error
        gw.delete_blacklist_entry(id).await.unwrap();

        let after = gw.fetch_blacklist_entry(id).await.unwrap();
        assert_eq!(after, BlacklistEntry::default_for(id));
    }
}

mod cache_tier {
    use super::*;

    #[tokio::test]
    async fn test_stale_entry_is_treated_as_absent_but_not_deleted() {
        let gw = gateway();

        gw.merge_search_result(SearchFixtures::aged_result(150))
            .await
            .unwrap()
            .expect("cache tier configured");

        let id = SearchFixtures::id();
        assert!(gw.get_search_result(&id, 100).await.unwrap().is_none());
        // eternal read still sees the row
        assert!(gw.get_search_result(&id, -1).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_fresh_entry_is_returned() {
        let gw = gateway();
        let stored = gw
            .merge_search_result(SearchFixtures::result())
            .await
            .unwrap()
            .expect("cache tier configured");

        let read = gw
            .get_search_result(&stored.id, 60_000)
            .await
            .unwrap()
            .expect("entry just stored");
        assert_eq!(read.payload, stored.payload);
    }

    #[tokio::test]
    async fn test_unknown_id_is_absent() {
        let gw = gateway();
        let id = SearchResultId::new("soundcloud", "never stored");
        assert!(gw.get_search_result(&id, -1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_without_cache_database_both_operations_are_noops() {
        let gw = EntityGateway::in_memory(IdFixtures::bot(), false);
        assert!(!gw.has_cache());

        let merged = gw.merge_search_result(SearchFixtures::result()).await.unwrap();
        assert!(merged.is_none());

        let read = gw.get_search_result(&SearchFixtures::id(), -1).await.unwrap();
        assert!(read.is_none());
    }
}

mod error_boundary {
    use super::*;

    #[tokio::test]
    async fn test_backend_failure_surfaces_as_the_single_opaque_error() {
        let gw = broken_gateway();
        let guild = IdFixtures::guild();

        let err = gw.fetch_guild_config(guild).await.unwrap_err();
        assert_eq!(err.to_string(), "persistence layer unavailable");
        assert!(err.cause().is_connection_error());

        // every operation shape translates the same way
        assert!(gw.get_prefix(guild).await.is_err());
        assert!(gw.delete_blacklist_entry(1).await.is_err());
        assert!(gw
            .transform_guild_config(guild, |c| c)
            .await
            .is_err());
        assert!(gw
            .merge_search_result(SearchFixtures::result())
            .await
            .is_err());
        assert!(gw
            .get_search_result(&SearchFixtures::id(), -1)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_transform_does_not_merge_after_failed_fetch() {
        // a failing fetch must short-circuit the transform; reaching merge
        // would double-log and attempt a write on a broken backend
        let gw = broken_gateway();
        let called = std::sync::atomic::AtomicBool::new(false);

        let result = gw
            .transform_guild_config(IdFixtures::guild(), |c| {
                called.store(true, std::sync::atomic::Ordering::SeqCst);
                c
            })
            .await;

        assert!(result.is_err());
        assert!(!called.load(std::sync::atomic::Ordering::SeqCst));
    }
}

mod properties {
    use super::*;
    use proptest::prelude::*;
    use test_utils::generators::guild_config_strategy;

    proptest! {
        #[test]
        fn prop_constant_transform_stores_exactly_that_value(config in guild_config_strategy()) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .build()
                .unwrap();
            rt.block_on(async {
                let gw = EntityGateway::in_memory(config.id.bot, false);
                let value = config.clone();

                let stored = gw
                    .transform_guild_config(config.id.guild, move |_| value)
                    .await
                    .unwrap();

                assert_eq!(stored, config);
                assert_eq!(gw.fetch_guild_config(config.id.guild).await.unwrap(), config);
            });
        }
    }
}
