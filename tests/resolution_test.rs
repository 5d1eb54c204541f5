//! Resolution through the cache against a real store.

mod common;

use std::sync::Arc;

use caas::adapters::cache::NoopEntryCache;
use caas::adapters::sqlite::create_test_store;
use caas::domain::models::{ConfigDraft, ProvisioningConfig};
use caas::services::CaasServices;
use common::test_env;

#[tokio::test]
async fn test_shared_value_without_override() {
    let env = test_env().await;
    let client = env.add_client("pos-1", "Register").await;
    let currency = env.add_config("currency", "EUR").await;
    env.assign(&client, &[(&currency, None)]).await;

    let resolved = env
        .services
        .resolver
        .resolve_config_value("pos-1", "Register", "currency")
        .await
        .unwrap()
        .expect("associated config should resolve");
    assert_eq!(resolved.value, "EUR");
    assert_eq!(resolved.config_id, currency.config_id);
}

#[tokio::test]
async fn test_override_wins_over_shared_value() {
    let env = test_env().await;
    let client = env.add_client("pos-1", "Register").await;
    let other = env.add_client("pos-2", "Register").await;
    let currency = env.add_config("currency", "EUR").await;
    env.assign(&client, &[(&currency, Some("CHF"))]).await;
    env.assign(&other, &[(&currency, None)]).await;

    let resolver = &env.services.resolver;
    let own = resolver.resolve_config_value("pos-1", "Register", "currency").await.unwrap().unwrap();
    let shared = resolver.resolve_config_value("pos-2", "Register", "currency").await.unwrap().unwrap();
    assert_eq!(own.value, "CHF");
    assert_eq!(shared.value, "EUR");

    // The global lookup never sees a client's override.
    assert_eq!(resolver.resolve_config("currency").await.unwrap().unwrap().value, "EUR");
}

#[tokio::test]
async fn test_repeated_reads_are_identical() {
    let env = test_env().await;
    env.add_config("A", "1").await;

    let first = env.services.resolver.resolve_config("A").await.unwrap();
    let second = env.services.resolver.resolve_config("A").await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_update_is_visible_to_every_reader() {
    let env = test_env().await;
    let client = env.add_client("pos-1", "Register").await;
    let config = env.add_config("K", "old").await;
    env.assign(&client, &[(&config, None)]).await;

    let resolver = &env.services.resolver;
    // Warm every cache entry first.
    assert_eq!(resolver.resolve_config("K").await.unwrap().unwrap().value, "old");
    assert_eq!(
        resolver.resolve_config_value("pos-1", "Register", "K").await.unwrap().unwrap().value,
        "old"
    );

    env.services
        .coordinator
        .update_config(config.config_id, ConfigDraft::new("K", "new"))
        .await
        .unwrap();

    assert_eq!(resolver.resolve_config("K").await.unwrap().unwrap().value, "new");
    assert_eq!(
        resolver.resolve_config_value("pos-1", "Register", "K").await.unwrap().unwrap().value,
        "new"
    );
}

#[tokio::test]
async fn test_add_then_get_round_trip() {
    let env = test_env().await;
    env.add_config("A", "1").await;

    let config = env.services.resolver.resolve_config("A").await.unwrap().unwrap();
    assert!(config.config_id > 0);
    assert_eq!(config.key, "A");
    assert_eq!(config.value, "1");
    assert!(config.updated.is_none());
}

#[tokio::test]
async fn test_unknown_client_and_key_are_not_found() {
    let env = test_env().await;
    let client = env.add_client("pos-1", "Register").await;
    let config = env.add_config("currency", "EUR").await;
    env.assign(&client, &[(&config, None)]).await;

    let resolver = &env.services.resolver;
    assert!(resolver.resolve_config_value("ghost", "Register", "currency").await.unwrap().is_none());
    assert!(resolver.resolve_config_value("pos-1", "Kiosk", "currency").await.unwrap().is_none());
    assert!(resolver.resolve_config_value("pos-1", "Register", "missing").await.unwrap().is_none());
    assert!(resolver.resolve_config("missing").await.unwrap().is_none());
    assert!(resolver.resolve_all_for_client("ghost", "Register").await.unwrap().is_none());
}

#[tokio::test]
async fn test_resolve_all_for_client_applies_overrides() {
    let env = test_env().await;
    let client = env.add_client("pos-1", "Register").await;
    let a = env.add_config("a", "1").await;
    let b = env.add_config("b", "2").await;
    env.add_config("c", "3").await;
    env.assign(&client, &[(&a, Some("10")), (&b, None)]).await;

    let mut configs = env
        .services
        .resolver
        .resolve_all_for_client("pos-1", "Register")
        .await
        .unwrap()
        .unwrap();
    configs.sort_by(|x, y| x.key.cmp(&y.key));

    let values: Vec<(&str, &str)> = configs.iter().map(|c| (c.key.as_str(), c.value.as_str())).collect();
    assert_eq!(values, vec![("a", "10"), ("b", "2")]);
    assert_eq!(env.services.resolver.resolve_all_configs().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_disabled_cache_reads_through_to_store() {
    let store = Arc::new(create_test_store().await.unwrap());
    let services = CaasServices::new(store, Arc::new(NoopEntryCache), &ProvisioningConfig::default());

    let config = services.coordinator.add_config(ConfigDraft::new("K", "1")).await.unwrap();
    assert_eq!(services.resolver.resolve_config("K").await.unwrap().unwrap().value, "1");

    services
        .coordinator
        .update_config(config.config_id, ConfigDraft::new("K", "2"))
        .await
        .unwrap();
    assert_eq!(services.resolver.resolve_config("K").await.unwrap().unwrap().value, "2");
}

#[tokio::test]
async fn test_clients_with_colliding_key_text_keep_their_overrides() {
    let env = test_env().await;
    let first = env.add_client("a-Tb", "c").await;
    let second = env.add_client("a", "b-Tc").await;
    let config = env.add_config("k", "shared").await;
    env.assign(&first, &[(&config, Some("one"))]).await;
    env.assign(&second, &[(&config, Some("two"))]).await;

    let resolver = &env.services.resolver;
    for _ in 0..2 {
        let one = resolver.resolve_config_value("a-Tb", "c", "k").await.unwrap().unwrap();
        let two = resolver.resolve_config_value("a", "b-Tc", "k").await.unwrap().unwrap();
        assert_eq!(one.value, "one");
        assert_eq!(two.value, "two");
    }

    let client = resolver.resolve_client("a-Tb", "c").await.unwrap().unwrap();
    assert_eq!(client.client_id, first.client_id);
}
