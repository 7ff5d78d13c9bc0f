use crate::api::OllamaApi;
use crate::tools;
use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

/// Report-only version of every `up` guard. Exits 1 when anything is
/// missing so scripts can gate on readiness.
pub async fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config_manager = super::manager(config_path)?;
    let config = config_manager.load_or_default();

    println!("{}", "Local AI Environment Status".bold().cyan());
    println!("{}", "===========================".cyan());
    println!();

    if config_manager.config_exists() {
        println!("Config: {}", config_manager.get_config_path().display());
    } else {
        println!(
            "Config: defaults (no file at {})",
            config_manager.get_config_path().display()
        );
    }
    println!();

    let mut ready = true;

    println!("{}", "Ollama:".bold());
    match tools::resolve_binary(&config.ollama.binary) {
        Some(path) => {
            let version = tools::probe_version(&path.to_string_lossy())
                .unwrap_or_else(|| "unknown version".to_string());
            println!(
                "  Installed: {} ✓ ({}, {})",
                "Yes".green(),
                path.display(),
                version
            );
        }
        None => {
            ready = false;
            println!("  Installed: {} ✗", "No".red());
            println!("  Tip: run {} to install", "localcode up".cyan());
        }
    }

    let api = OllamaApi::new(&config.ollama.host)?;
    let mut serving = false;
    match api.version().await {
        Ok(version) => {
            serving = true;
            println!(
                "  Serving: {} ✓ (v{} at {})",
                "Yes".green(),
                version.version,
                config.ollama.host
            );
        }
        Err(_) => {
            ready = false;
            println!(
                "  Serving: {} ✗ (no response from {})",
                "No".red(),
                config.ollama.host
            );
            println!("  Tip: run {} to start the service", "localcode up".cyan());
        }
    }

    if serving {
        match api.has_model(&config.model).await {
            Ok(true) => println!("  Model {}: {} ✓", config.model.cyan(), "Present".green()),
            Ok(false) => {
                ready = false;
                println!("  Model {}: {} ✗", config.model.cyan(), "Missing".red());
                println!(
                    "  Tip: run {} to fetch it",
                    format!("localcode pull {}", config.model).cyan()
                );
            }
            Err(e) => {
                ready = false;
                println!(
                    "  Model {}: {} (model listing failed: {})",
                    config.model.cyan(),
                    "Unknown".yellow(),
                    e
                );
            }
        }
    } else {
        println!(
            "  Model {}: {} (service not reachable)",
            config.model.cyan(),
            "Unknown".yellow()
        );
    }
    println!();

    println!("{}", "OpenCode:".bold());
    match tools::resolve_binary(&config.opencode.binary) {
        Some(path) => {
            let version = tools::probe_version(&path.to_string_lossy())
                .unwrap_or_else(|| "unknown version".to_string());
            println!(
                "  Installed: {} ✓ ({}, {})",
                "Yes".green(),
                path.display(),
                version
            );
        }
        None => {
            ready = false;
            println!("  Installed: {} ✗", "No".red());
            println!("  Tip: run {} to install", "localcode up".cyan());
        }
    }
    println!("  Provider: {}", config.opencode.provider);
    println!();

    if ready {
        println!("{} Everything ready", "✓".green().bold());
    } else {
        println!(
            "{} Environment not ready; run {}",
            "✗".red().bold(),
            "localcode up".cyan()
        );
        std::process::exit(1);
    }

    Ok(())
}
