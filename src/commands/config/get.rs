use anyhow::{Result, bail};
use std::path::PathBuf;

pub async fn execute(config_path: Option<PathBuf>, key: String) -> Result<()> {
    let config_manager = crate::commands::manager(config_path)?;
    let config = config_manager.load_or_default();

    // Dotted key paths, e.g. "ollama.host"
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["version"] => println!("{}", config.version),
        ["model"] => println!("{}", config.model),
        ["ollama", "binary"] => println!("{}", config.ollama.binary),
        ["ollama", "host"] => println!("{}", config.ollama.host),
        ["ollama", "startup_timeout_secs"] => {
            println!("{}", config.ollama.startup_timeout_secs)
        }
        ["opencode", "binary"] => println!("{}", config.opencode.binary),
        ["opencode", "provider"] => println!("{}", config.opencode.provider),
        ["install", "allow_package_manager"] => {
            println!("{}", config.install.allow_package_manager)
        }
        ["install", "allow_artifact"] => println!("{}", config.install.allow_artifact),
        ["install", "bin_dir"] => {
            if let Some(dir) = &config.install.bin_dir {
                println!("{}", dir.display());
            }
        }
        _ => bail!("Unknown configuration key: {}", key),
    }

    Ok(())
}
