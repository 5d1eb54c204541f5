//! CLI command implementations.

pub mod migrate;
pub mod serve;

use anyhow::Result;
use std::path::Path;

use crate::domain::models::Settings;
use crate::infrastructure::config::SettingsLoader;

/// Load settings, honouring an explicit `--config` file.
pub(crate) fn load_settings(config: Option<&Path>) -> Result<Settings> {
    SettingsLoader::load_from(config)
}
