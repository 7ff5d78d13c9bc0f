use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

pub async fn execute(config_path: Option<PathBuf>, json: bool) -> Result<()> {
    let config_manager = crate::commands::manager(config_path)?;
    let config = config_manager.load_or_default();

    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("{}", "localcode configuration".bold());
    println!();
    println!("Version: {}", config.version);
    println!("Model: {}", config.model);
    println!();
    println!("{}:", "Ollama".cyan());
    println!("  binary: {}", config.ollama.binary);
    println!("  host: {}", config.ollama.host);
    println!(
        "  startup_timeout_secs: {}",
        config.ollama.startup_timeout_secs
    );
    println!();
    println!("{}:", "OpenCode".cyan());
    println!("  binary: {}", config.opencode.binary);
    println!("  provider: {}", config.opencode.provider);
    println!();
    println!("{}:", "Install".cyan());
    println!(
        "  allow_package_manager: {}",
        config.install.allow_package_manager
    );
    println!("  allow_artifact: {}", config.install.allow_artifact);
    match &config.install.bin_dir {
        Some(dir) => println!("  bin_dir: {}", dir.display()),
        None => println!("  bin_dir: (default ~/.local/bin)"),
    }

    if !config_manager.config_exists() {
        println!();
        println!(
            "No config file yet; defaults shown. {} writes one.",
            "localcode config set".cyan()
        );
    }

    Ok(())
}
