//! HTTP surface exercised through the router without a socket.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use caas::adapters::http::build_router;
use caas::domain::models::ProvisioningConfig;
use caas::domain::ports::CheckInRepository;
use common::{test_env, test_env_with, TestEnv};

fn router(env: &TestEnv) -> Router {
    build_router(env.services.clone(), false)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (status, value)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

#[tokio::test]
async fn test_health() {
    let env = test_env().await;
    let (status, body) = get(&router(&env), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("OK".into()));
}

#[tokio::test]
async fn test_admin_crud_then_public_reads() {
    let env = test_env().await;
    let app = router(&env);

    let (status, client_type) = send(&app, Method::POST, "/api/admin/client-types", Some(json!({"name": "Register"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(client_type["name"], "Register");

    let (status, client) = send(
        &app,
        Method::POST,
        "/api/admin/clients",
        Some(json!({"identifier": "pos-1", "clientType": "Register"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let client_id = client["clientId"].as_i64().unwrap();

    let (status, config) = send(&app, Method::POST, "/api/admin/configs", Some(json!({"key": "currency", "value": "EUR"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    let config_id = config["configId"].as_i64().unwrap();

    let (status, associations) = send(
        &app,
        Method::PUT,
        &format!("/api/admin/clients/{client_id}/associations"),
        Some(json!([{"configId": config_id, "value": "CHF"}])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(associations[0]["overrideValue"], "CHF");
    assert_eq!(associations[0]["effectiveValue"], "CHF");

    let (status, shared) = get(&app, "/api/config?key=currency").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(shared["value"], "EUR");

    let (status, own) = get(&app, "/api/config/client?identifier=pos-1&type=Register&key=currency").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(own["value"], "CHF");

    let (status, all) = get(&app, "/api/configs/client?identifier=pos-1&type=Register").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 1);

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/admin/configs/{config_id}"),
        Some(json!({"key": "currency", "value": "USD"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["value"], "USD");
    let (_, shared) = get(&app, "/api/config?key=currency").await;
    assert_eq!(shared["value"], "USD");

    let (status, _) = send(&app, Method::DELETE, &format!("/api/admin/configs/{config_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, body) = get(&app, "/api/config/client?identifier=pos-1&type=Register&key=currency").await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn test_missing_values_are_no_content() {
    let env = test_env().await;
    let app = router(&env);

    assert_eq!(get(&app, "/api/config?key=nothing").await.0, StatusCode::NO_CONTENT);
    assert_eq!(
        get(&app, "/api/configs/client?identifier=ghost&type=Register").await.0,
        StatusCode::NO_CONTENT
    );

    let (status, all) = get(&app, "/api/configs").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all, json!([]));
}

#[tokio::test]
async fn test_check_in_rejected_for_unknown_client() {
    let env = test_env().await;
    let app = router(&env);

    let (status, body) = send(&app, Method::POST, "/api/check-in", Some(json!({"identifier": "ghost", "type": "Register"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "CHECK_IN_REJECTED");
}

#[tokio::test]
async fn test_check_in_provisions_and_lists() {
    let env = test_env_with(ProvisioningConfig {
        create_clients: true,
        check_in_on_read: false,
    })
    .await;
    let app = router(&env);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/check-in",
        Some(json!({"identifier": "pos-7", "type": "Register", "extraData": {"build": 12}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recorded"], true);

    let (status, check_ins) = get(&app, "/api/admin/check-ins?limit=5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(check_ins[0]["identifier"], "pos-7");
    assert_eq!(check_ins[0]["extraData"], r#"{"build":12}"#);

    // Reads do not check in while check-in on read is off.
    get(&app, "/api/configs/client?identifier=pos-7&type=Register").await;
    assert_eq!(env.store.list_recent_check_ins(10).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_client_reads_check_in_when_enabled() {
    let env = test_env().await;
    env.add_client("pos-1", "Register").await;
    let app = router(&env);

    let (status, configs) = get(&app, "/api/configs/client?identifier=pos-1&type=Register").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(configs, json!([]));
    assert_eq!(env.store.list_recent_check_ins(10).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_admin_errors_map_to_status_codes() {
    let env = test_env().await;
    let client = env.add_client("pos-1", "Register").await;
    let config = env.add_config("a", "1").await;
    let app = router(&env);

    let (status, body) = get(&app, "/api/admin/configs/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/admin/clients/{}/associations", client.client_id),
        Some(json!([{"configId": config.config_id}, {"configId": config.config_id}])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "DUPLICATE_ASSOCIATION");

    let (status, body) = send(&app, Method::POST, "/api/admin/configs", Some(json!({"key": "a", "value": "2"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "CONFLICT");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/admin/clients",
        Some(json!({"identifier": "pos-2", "clientType": "Unknown"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "DANGLING_REFERENCE");
}

#[tokio::test]
async fn test_association_listing_from_both_sides() {
    let env = test_env().await;
    let client = env.add_client("pos-1", "Register").await;
    let config = env.add_config("theme", "light").await;
    env.assign(&client, &[(&config, None)]).await;
    let app = router(&env);

    let (status, by_client) = get(&app, &format!("/api/admin/clients/{}/associations", client.client_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_client[0]["key"], "theme");
    assert_eq!(by_client[0]["overrideValue"], Value::Null);
    assert_eq!(by_client[0]["effectiveValue"], "light");

    let (status, by_config) = get(&app, &format!("/api/admin/configs/{}/associations", config.config_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_config[0]["identifier"], "pos-1");
    assert_eq!(by_config[0]["clientType"], "Register");
}
