use super::types::Config;
use crate::error::{Result, SetupError};
use crate::utils::paths;
use atomicwrites::{AllowOverwrite, AtomicFile};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        let config_path = paths::get_config_path()?;
        Ok(Self { config_path })
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    pub fn load(&self) -> Result<Config> {
        if !self.config_path.exists() {
            return Err(SetupError::ConfigInvalid {
                message: format!("no configuration file at {}", self.config_path.display()),
            });
        }

        debug!("Loading config from {:?}", self.config_path);
        let contents = fs::read_to_string(&self.config_path)?;
        let config: Config = serde_json::from_str(&contents)?;

        self.validate(&config)?;
        Ok(config)
    }

    /// Missing or unreadable config falls back to defaults; the bootstrap
    /// must work on a fresh host with no prior state.
    pub fn load_or_default(&self) -> Config {
        if !self.config_path.exists() {
            return Config::default();
        }
        match self.load() {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to load config: {}, using default", e);
                Config::default()
            }
        }
    }

    /// Create a backup of the current config file
    pub fn backup(&self) -> Result<()> {
        if self.config_path.exists() {
            let backup_path = self.config_path.with_extension("json.bak");
            fs::copy(&self.config_path, backup_path)?;
            debug!("Created config backup");
        }
        Ok(())
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        self.validate(config)?;

        if let Some(parent) = self.config_path.parent() {
            paths::ensure_dir(parent)?;
        }

        self.backup()?;

        debug!("Saving config to {:?}", self.config_path);
        let json = serde_json::to_string_pretty(config)?;

        let af = AtomicFile::new(&self.config_path, AllowOverwrite);
        af.write(|f| f.write_all(json.as_bytes()))
            .map_err(|e| std::io::Error::other(e.to_string()))?;

        info!("Configuration saved successfully");
        Ok(())
    }

    pub fn validate(&self, config: &Config) -> Result<()> {
        if config.model.trim().is_empty() {
            return Err(SetupError::ConfigInvalid {
                message: "model must not be empty".to_string(),
            });
        }
        url::Url::parse(&config.ollama.host).map_err(|e| SetupError::ConfigInvalid {
            message: format!("ollama.host is not a valid URL: {e}"),
        })?;
        if config.ollama.startup_timeout_secs == 0 {
            return Err(SetupError::ConfigInvalid {
                message: "ollama.startup_timeout_secs must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn config_exists(&self) -> bool {
        self.config_path.exists()
    }

    pub fn get_config_path(&self) -> &Path {
        &self.config_path
    }
}
