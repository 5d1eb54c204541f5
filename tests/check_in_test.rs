//! Check-in recording and auto-provisioning.

mod common;

use caas::domain::models::{CheckInOutcome, ProvisioningConfig};
use caas::domain::ports::{CheckInRepository, ClientTypeRepository};
use common::{test_env, test_env_with};

fn provisioning(create_clients: bool) -> ProvisioningConfig {
    ProvisioningConfig {
        create_clients,
        ..ProvisioningConfig::default()
    }
}

#[tokio::test]
async fn test_unknown_client_rejected_without_provisioning() {
    let env = test_env_with(provisioning(false)).await;

    let outcome = env.services.check_ins.check_in("unknownClient", "TypeX", None).await.unwrap();

    assert_eq!(outcome, CheckInOutcome::Rejected);
    assert!(env.store.list_recent_check_ins(10).await.unwrap().is_empty());
    assert!(env.store.find_client_type_by_name("TypeX").await.unwrap().is_none());
}

#[tokio::test]
async fn test_unknown_client_provisioned_when_enabled() {
    let env = test_env_with(provisioning(true)).await;

    let outcome = env.services.check_ins.check_in("newClient", "TypeX", None).await.unwrap();
    assert_eq!(outcome, CheckInOutcome::Recorded);

    assert!(env.store.find_client_type_by_name("TypeX").await.unwrap().is_some());
    let check_ins = env.store.list_recent_check_ins(10).await.unwrap();
    assert_eq!(check_ins.len(), 1);
    assert_eq!(check_ins[0].identifier, "newClient");
    assert_eq!(check_ins[0].client_type, "TypeX");

    let configs = env
        .services
        .resolver
        .resolve_all_for_client("newClient", "TypeX")
        .await
        .unwrap();
    assert_eq!(configs, Some(Vec::new()));
}

#[tokio::test]
async fn test_provisioning_reuses_existing_type() {
    let env = test_env_with(provisioning(true)).await;
    let existing = env.add_client("pos-1", "Register").await;

    env.services.check_ins.check_in("pos-2", "Register", None).await.unwrap();

    let created = env.services.resolver.resolve_client("pos-2", "Register").await.unwrap().unwrap();
    assert_eq!(created.client_type_id(), existing.client_type_id());
    assert_eq!(env.services.catalog.list_client_types().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_known_client_check_in_stores_extra_data_verbatim() {
    let env = test_env().await;
    env.add_client("pos-1", "Register").await;

    let outcome = env
        .services
        .check_ins
        .check_in("pos-1", "Register", Some(r#"{"version":"2.4.1"}"#.to_string()))
        .await
        .unwrap();
    assert!(outcome.is_recorded());

    let recent = env.services.catalog.recent_check_ins(None).await.unwrap();
    assert_eq!(recent.len(), 1);
    let extra: serde_json::Value = recent[0].check_in.parse_extra_data().unwrap().unwrap();
    assert_eq!(extra["version"], "2.4.1");
}

#[tokio::test]
async fn test_check_ins_are_listed_newest_first() {
    let env = test_env().await;
    env.add_client("pos-1", "Register").await;
    env.add_client("pos-2", "Register").await;

    env.services.check_ins.check_in("pos-1", "Register", None).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    env.services.check_ins.check_in("pos-2", "Register", None).await.unwrap();

    let recent = env.services.catalog.recent_check_ins(Some(10)).await.unwrap();
    let order: Vec<&str> = recent.iter().map(|c| c.identifier.as_str()).collect();
    assert_eq!(order, vec!["pos-2", "pos-1"]);
}
