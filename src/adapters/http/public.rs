//! Public read and check-in endpoints used by configuration clients.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::error::{domain_error, ApiResult};
use crate::domain::errors::DomainError;
use crate::domain::models::payload;
use crate::domain::ports::ConfigStore;
use crate::services::CaasServices;

#[derive(Debug, Deserialize)]
pub struct ConfigParams {
    pub key: String,
}

#[derive(Debug, Deserialize)]
pub struct ClientParams {
    pub identifier: String,
    #[serde(rename = "type")]
    pub client_type: String,
}

#[derive(Debug, Deserialize)]
pub struct ClientConfigParams {
    pub identifier: String,
    #[serde(rename = "type")]
    pub client_type: String,
    pub key: String,
}

/// Check-in body. `extraData` may be any JSON value.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRequest {
    pub identifier: String,
    #[serde(rename = "type", alias = "clientType")]
    pub client_type: String,
    #[serde(default)]
    pub extra_data: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckInResponse {
    pub recorded: bool,
}

/// `Json(value)` or 204 when there is nothing to return.
fn json_or_no_content<T: Serialize>(value: Option<T>) -> Response {
    match value {
        Some(value) => Json(value).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// Record a check-in for a client reading its own configuration.
///
/// Never fails the read.
async fn check_in_on_read<S: ConfigStore>(state: &CaasServices<S>, identifier: &str, client_type: &str) {
    if !state.check_in_on_read {
        return;
    }
    if let Err(e) = state.check_ins.check_in(identifier, client_type, None).await {
        tracing::warn!(identifier, client_type, error = %e, "check-in on read failed");
    }
}

pub async fn get_config<S: ConfigStore>(
    State(state): State<Arc<CaasServices<S>>>,
    Query(params): Query<ConfigParams>,
) -> ApiResult<Response> {
    let config = state.resolver.resolve_config(&params.key).await.map_err(domain_error)?;
    Ok(json_or_no_content(config))
}

pub async fn get_config_for_client<S: ConfigStore>(
    State(state): State<Arc<CaasServices<S>>>,
    Query(params): Query<ClientConfigParams>,
) -> ApiResult<Response> {
    check_in_on_read(&state, &params.identifier, &params.client_type).await;

    let config = state
        .resolver
        .resolve_config_value(&params.identifier, &params.client_type, &params.key)
        .await
        .map_err(domain_error)?;
    Ok(json_or_no_content(config))
}

pub async fn get_all_configs<S: ConfigStore>(State(state): State<Arc<CaasServices<S>>>) -> ApiResult<Response> {
    let configs = state.resolver.resolve_all_configs().await.map_err(domain_error)?;
    Ok(Json(configs).into_response())
}

pub async fn get_all_configs_for_client<S: ConfigStore>(
    State(state): State<Arc<CaasServices<S>>>,
    Query(params): Query<ClientParams>,
) -> ApiResult<Response> {
    check_in_on_read(&state, &params.identifier, &params.client_type).await;

    let configs = state
        .resolver
        .resolve_all_for_client(&params.identifier, &params.client_type)
        .await
        .map_err(domain_error)?;
    Ok(json_or_no_content(configs))
}

pub async fn check_in<S: ConfigStore>(
    State(state): State<Arc<CaasServices<S>>>,
    Json(req): Json<CheckInRequest>,
) -> ApiResult<Json<CheckInResponse>> {
    let extra_data = req.extra_data.and_then(payload::from_json);
    let outcome = state
        .check_ins
        .check_in(&req.identifier, &req.client_type, extra_data)
        .await
        .map_err(domain_error)?;

    if !outcome.is_recorded() {
        return Err(domain_error(DomainError::CheckInRejected {
            identifier: req.identifier,
            client_type: req.client_type,
        }));
    }

    Ok(Json(CheckInResponse { recorded: true }))
}
