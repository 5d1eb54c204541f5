//! Implementation of the `caas serve` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::Path;
use std::sync::Arc;

use crate::adapters::cache::build_entry_cache;
use crate::adapters::http::{CaasHttpServer, HttpConfig};
use crate::adapters::sqlite::{initialize_database, SqliteStore};
use crate::infrastructure::logging::{LogConfig, LoggerImpl};
use crate::services::CaasServices;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Host to bind to, overriding the configured host
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on, overriding the configured port
    #[arg(short, long)]
    pub port: Option<u16>,
}

pub async fn execute(args: ServeArgs, config: Option<&Path>) -> Result<()> {
    let mut settings = super::load_settings(config)?;
    if let Some(host) = args.host {
        settings.server.host = host;
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }

    let _logger = LoggerImpl::init(&LogConfig::from(&settings.logging))?;

    let pool = initialize_database(&settings.database)
        .await
        .with_context(|| format!("Failed to initialize database at {}", settings.database.path))?;
    let store = Arc::new(SqliteStore::new(pool.clone()));
    let cache = build_entry_cache(&settings.cache);
    let services = Arc::new(CaasServices::new(store, cache, &settings.provisioning));

    tracing::info!(
        database = %settings.database.path,
        cache_enabled = settings.cache.enabled,
        create_clients = settings.provisioning.create_clients,
        "starting configuration service"
    );

    let server = CaasHttpServer::new(services, HttpConfig::from(&settings.server));
    server
        .serve_with_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!(e))
        .context("HTTP server failed")?;

    pool.close().await;
    tracing::info!("configuration service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
