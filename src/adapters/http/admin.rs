//! Administrative CRUD endpoints.
//!
//! Every write goes through the invalidation coordinator so the cache follows
//! the store. Reads go through the catalog and never touch the cache.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::error::{domain_error, ApiResult};
use crate::domain::models::{
    AssociationBinding, CheckInDetail, Client, ClientAssignment, ClientDraft, ClientType, ClientTypeDraft, Config,
    ConfigAssignment, ConfigDraft,
};
use crate::domain::ports::ConfigStore;
use crate::services::CaasServices;

type AdminState<S> = State<Arc<CaasServices<S>>>;

#[derive(Debug, Deserialize)]
pub struct CheckInQueryParams {
    #[serde(default)]
    pub limit: Option<u32>,
}

/// An association as shown to administrators, with the value the client sees.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociationResponse {
    pub config_association_id: i64,
    pub client_id: i64,
    pub identifier: String,
    pub client_type: String,
    pub config_id: i64,
    pub key: String,
    pub override_value: Option<String>,
    pub effective_value: String,
}

impl From<AssociationBinding> for AssociationResponse {
    fn from(b: AssociationBinding) -> Self {
        let effective_value = b.effective_config().value;
        Self {
            config_association_id: b.association.config_association_id,
            client_id: b.association.client_id,
            identifier: b.identifier,
            client_type: b.client_type,
            config_id: b.association.config_id,
            key: b.config.key,
            override_value: b.association.value,
            effective_value,
        }
    }
}

fn associations(bindings: Vec<AssociationBinding>) -> Json<Vec<AssociationResponse>> {
    Json(bindings.into_iter().map(AssociationResponse::from).collect())
}

// Client types

pub async fn list_client_types<S: ConfigStore>(State(state): AdminState<S>) -> ApiResult<Json<Vec<ClientType>>> {
    state.catalog.list_client_types().await.map(Json).map_err(domain_error)
}

pub async fn get_client_type<S: ConfigStore>(
    State(state): AdminState<S>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ClientType>> {
    state.catalog.get_client_type(id).await.map(Json).map_err(domain_error)
}

pub async fn add_client_type<S: ConfigStore>(
    State(state): AdminState<S>,
    Json(draft): Json<ClientTypeDraft>,
) -> ApiResult<(StatusCode, Json<ClientType>)> {
    let client_type = state.coordinator.add_client_type(draft).await.map_err(domain_error)?;
    Ok((StatusCode::CREATED, Json(client_type)))
}

pub async fn update_client_type<S: ConfigStore>(
    State(state): AdminState<S>,
    Path(id): Path<i64>,
    Json(draft): Json<ClientTypeDraft>,
) -> ApiResult<Json<ClientType>> {
    state.coordinator.update_client_type(id, draft).await.map(Json).map_err(domain_error)
}

pub async fn delete_client_type<S: ConfigStore>(
    State(state): AdminState<S>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.coordinator.delete_client_type(id).await.map_err(domain_error)?;
    Ok(StatusCode::NO_CONTENT)
}

// Clients

pub async fn list_clients<S: ConfigStore>(State(state): AdminState<S>) -> ApiResult<Json<Vec<Client>>> {
    state.catalog.list_clients().await.map(Json).map_err(domain_error)
}

pub async fn get_client<S: ConfigStore>(State(state): AdminState<S>, Path(id): Path<i64>) -> ApiResult<Json<Client>> {
    state.catalog.get_client(id).await.map(Json).map_err(domain_error)
}

pub async fn add_client<S: ConfigStore>(
    State(state): AdminState<S>,
    Json(draft): Json<ClientDraft>,
) -> ApiResult<(StatusCode, Json<Client>)> {
    let client = state.coordinator.add_client(draft).await.map_err(domain_error)?;
    Ok((StatusCode::CREATED, Json(client)))
}

pub async fn update_client<S: ConfigStore>(
    State(state): AdminState<S>,
    Path(id): Path<i64>,
    Json(draft): Json<ClientDraft>,
) -> ApiResult<Json<Client>> {
    state.coordinator.update_client(id, draft).await.map(Json).map_err(domain_error)
}

pub async fn delete_client<S: ConfigStore>(State(state): AdminState<S>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    state.coordinator.delete_client(id).await.map_err(domain_error)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_client_associations<S: ConfigStore>(
    State(state): AdminState<S>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<AssociationResponse>>> {
    state.catalog.associations_for_client(id).await.map(associations).map_err(domain_error)
}

pub async fn manage_client_associations<S: ConfigStore>(
    State(state): AdminState<S>,
    Path(id): Path<i64>,
    Json(assignments): Json<Vec<ConfigAssignment>>,
) -> ApiResult<Json<Vec<AssociationResponse>>> {
    state
        .coordinator
        .manage_associations_for_client(id, assignments)
        .await
        .map(associations)
        .map_err(domain_error)
}

// Configs

pub async fn list_configs<S: ConfigStore>(State(state): AdminState<S>) -> ApiResult<Json<Vec<Config>>> {
    state.catalog.list_configs().await.map(Json).map_err(domain_error)
}

pub async fn get_config<S: ConfigStore>(State(state): AdminState<S>, Path(id): Path<i64>) -> ApiResult<Json<Config>> {
    state.catalog.get_config(id).await.map(Json).map_err(domain_error)
}

pub async fn add_config<S: ConfigStore>(
    State(state): AdminState<S>,
    Json(draft): Json<ConfigDraft>,
) -> ApiResult<(StatusCode, Json<Config>)> {
    let config = state.coordinator.add_config(draft).await.map_err(domain_error)?;
    Ok((StatusCode::CREATED, Json(config)))
}

pub async fn update_config<S: ConfigStore>(
    State(state): AdminState<S>,
    Path(id): Path<i64>,
    Json(draft): Json<ConfigDraft>,
) -> ApiResult<Json<Config>> {
    state.coordinator.update_config(id, draft).await.map(Json).map_err(domain_error)
}

pub async fn delete_config<S: ConfigStore>(State(state): AdminState<S>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    state.coordinator.delete_config(id).await.map_err(domain_error)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_config_associations<S: ConfigStore>(
    State(state): AdminState<S>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<AssociationResponse>>> {
    state.catalog.associations_for_config(id).await.map(associations).map_err(domain_error)
}

pub async fn manage_config_associations<S: ConfigStore>(
    State(state): AdminState<S>,
    Path(id): Path<i64>,
    Json(assignments): Json<Vec<ClientAssignment>>,
) -> ApiResult<Json<Vec<AssociationResponse>>> {
    state
        .coordinator
        .manage_associations_for_config(id, assignments)
        .await
        .map(associations)
        .map_err(domain_error)
}

// Check-ins

pub async fn recent_check_ins<S: ConfigStore>(
    State(state): AdminState<S>,
    Query(params): Query<CheckInQueryParams>,
) -> ApiResult<Json<Vec<CheckInDetail>>> {
    state.catalog.recent_check_ins(params.limit).await.map(Json).map_err(domain_error)
}
