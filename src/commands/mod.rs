pub mod config;
pub mod pull;
pub mod status;
pub mod up;

use crate::config::ConfigManager;
use anyhow::Result;
use std::path::PathBuf;

/// Config manager for this invocation, honoring a `--config` override.
pub(crate) fn manager(config_path: Option<PathBuf>) -> Result<ConfigManager> {
    match config_path {
        Some(path) => Ok(ConfigManager::with_path(path)),
        None => Ok(ConfigManager::new()?),
    }
}
