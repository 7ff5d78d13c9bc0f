use anyhow::{Context, Result, bail};
use colored::Colorize;
use std::path::PathBuf;

pub async fn execute(config_path: Option<PathBuf>, key: String, value: String) -> Result<()> {
    let config_manager = crate::commands::manager(config_path)?;
    let mut config = config_manager.load_or_default();

    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["model"] => config.model = value.clone(),
        ["ollama", "binary"] => config.ollama.binary = value.clone(),
        ["ollama", "host"] => config.ollama.host = value.clone(),
        ["ollama", "startup_timeout_secs"] => {
            config.ollama.startup_timeout_secs = value
                .parse()
                .context("startup_timeout_secs must be a positive integer")?;
        }
        ["opencode", "binary"] => config.opencode.binary = value.clone(),
        ["opencode", "provider"] => config.opencode.provider = value.clone(),
        ["install", "allow_package_manager"] => {
            config.install.allow_package_manager =
                value.parse().context("Expected true or false")?;
        }
        ["install", "allow_artifact"] => {
            config.install.allow_artifact = value.parse().context("Expected true or false")?;
        }
        ["install", "bin_dir"] => config.install.bin_dir = Some(PathBuf::from(&value)),
        _ => bail!("Cannot set '{}': unknown configuration key", key),
    }

    // save() validates and writes a .bak of the previous file
    config_manager.save(&config)?;

    println!("Set {} to '{}'", key.cyan(), value);
    println!("{} Configuration updated", "✓".green());
    Ok(())
}
