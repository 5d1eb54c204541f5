//! Implementation of the `caas migrate` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};

use crate::adapters::sqlite::{all_embedded_migrations, create_pool, Migrator, PoolConfig};
use crate::cli::output::{output, CommandOutput};

#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Database file, overriding the configured path
    #[arg(long)]
    pub database: Option<PathBuf>,
}

#[derive(Debug, serde::Serialize)]
pub struct MigrateOutput {
    pub database: String,
    pub applied: usize,
    pub schema_version: i64,
}

impl CommandOutput for MigrateOutput {
    fn to_human(&self) -> String {
        if self.applied == 0 {
            format!("{} is up to date (schema version {})", self.database, self.schema_version)
        } else {
            format!(
                "Applied {} migration(s) to {} (schema version {})",
                self.applied, self.database, self.schema_version
            )
        }
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: MigrateArgs, config: Option<&Path>, json_mode: bool) -> Result<()> {
    let mut settings = super::load_settings(config)?;
    if let Some(path) = args.database {
        settings.database.path = path.display().to_string();
    }

    let result = migrate(&settings.database.url(), PoolConfig::from(&settings.database)).await?;
    output(
        &MigrateOutput {
            database: settings.database.path,
            ..result
        },
        json_mode,
    );
    Ok(())
}

async fn migrate(url: &str, pool_config: PoolConfig) -> Result<MigrateOutput> {
    let pool = create_pool(url, Some(pool_config))
        .await
        .with_context(|| format!("Failed to open database {url}"))?;
    let migrator = Migrator::new(pool.clone());

    let applied = migrator
        .run_embedded_migrations(all_embedded_migrations())
        .await
        .context("Failed to apply migrations")?;
    let schema_version = migrator.get_current_version().await?;
    pool.close().await;

    Ok(MigrateOutput {
        database: url.to_string(),
        applied,
        schema_version,
    })
}
