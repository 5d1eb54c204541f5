//! HTTP API server.
//!
//! Public endpoints serve configuration to clients and accept check-ins;
//! `/api/admin` exposes CRUD over every entity.

pub mod admin;
pub mod error;
pub mod public;

pub use error::{ApiError, ApiResult, ErrorResponse};

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::domain::models::ServerConfig;
use crate::domain::ports::ConfigStore;
use crate::services::CaasServices;

/// Configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Whether to enable CORS.
    pub enable_cors: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self::from(&ServerConfig::default())
    }
}

impl From<&ServerConfig> for HttpConfig {
    fn from(server: &ServerConfig) -> Self {
        Self {
            host: server.host.clone(),
            port: server.port,
            enable_cors: server.enable_cors,
        }
    }
}

/// Build the full router over shared services.
pub fn build_router<S: ConfigStore>(services: Arc<CaasServices<S>>, enable_cors: bool) -> Router {
    let admin_routes = Router::new()
        .route("/client-types", get(admin::list_client_types::<S>).post(admin::add_client_type::<S>))
        .route(
            "/client-types/{id}",
            get(admin::get_client_type::<S>)
                .put(admin::update_client_type::<S>)
                .delete(admin::delete_client_type::<S>),
        )
        .route("/clients", get(admin::list_clients::<S>).post(admin::add_client::<S>))
        .route(
            "/clients/{id}",
            get(admin::get_client::<S>)
                .put(admin::update_client::<S>)
                .delete(admin::delete_client::<S>),
        )
        .route(
            "/clients/{id}/associations",
            get(admin::get_client_associations::<S>).put(admin::manage_client_associations::<S>),
        )
        .route("/configs", get(admin::list_configs::<S>).post(admin::add_config::<S>))
        .route(
            "/configs/{id}",
            get(admin::get_config::<S>)
                .put(admin::update_config::<S>)
                .delete(admin::delete_config::<S>),
        )
        .route(
            "/configs/{id}/associations",
            get(admin::get_config_associations::<S>).put(admin::manage_config_associations::<S>),
        )
        .route("/check-ins", get(admin::recent_check_ins::<S>));

    let app = Router::new()
        .route("/api/config", get(public::get_config::<S>))
        .route("/api/config/client", get(public::get_config_for_client::<S>))
        .route("/api/configs", get(public::get_all_configs::<S>))
        .route("/api/configs/client", get(public::get_all_configs_for_client::<S>))
        .route("/api/check-in", post(public::check_in::<S>))
        .nest("/api/admin", admin_routes)
        .route("/health", get(health_check))
        .with_state(services);

    if enable_cors {
        app.layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
            .layer(TraceLayer::new_for_http())
    } else {
        app.layer(TraceLayer::new_for_http())
    }
}

/// Configuration service HTTP server.
pub struct CaasHttpServer<S: ConfigStore> {
    config: HttpConfig,
    services: Arc<CaasServices<S>>,
}

impl<S: ConfigStore> CaasHttpServer<S> {
    pub fn new(services: Arc<CaasServices<S>>, config: HttpConfig) -> Self {
        Self { config, services }
    }

    fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.config.host, self.config.port).parse()
    }

    /// Start the server.
    pub async fn serve(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.serve_with_shutdown(std::future::pending()).await
    }

    /// Start the server with a shutdown signal.
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr = self.bind_addr()?;
        let router = build_router(self.services, self.config.enable_cors);

        tracing::info!("CaaS HTTP server listening on {}", addr);

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, router).with_graceful_shutdown(shutdown).await?;
        Ok(())
    }
}

async fn health_check() -> &'static str {
    "OK"
}
