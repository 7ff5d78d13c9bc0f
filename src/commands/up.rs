use crate::api::OllamaApi;
use crate::install::InstallPolicy;
use crate::service;
use crate::tools::{self, ollama, opencode};
use crate::utils::paths;
use anyhow::{Context, Result, bail};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Bring the host to a ready state: runtime installed and serving, model
/// pulled, assistant installed and pointed at the local provider. Every
/// step checks before it mutates, so a second run is a no-op.
pub async fn execute(
    config_path: Option<PathBuf>,
    model: Option<String>,
    timeout_secs: Option<u64>,
    no_install: bool,
) -> Result<()> {
    let config_manager = super::manager(config_path)?;
    let mut config = config_manager.load_or_default();
    if let Some(model) = model {
        config.model = model;
    }
    if let Some(secs) = timeout_secs {
        config.ollama.startup_timeout_secs = secs;
    }
    config_manager.validate(&config)?;

    let policy = InstallPolicy::from(&config.install);
    let bin_dir = match &config.install.bin_dir {
        Some(dir) => paths::expand_path(dir)?,
        None => paths::default_bin_dir()?,
    };

    println!("{} Checking ollama runtime...", "[1/4]".bold().cyan());
    let ollama_bin = match tools::resolve_binary(&config.ollama.binary) {
        Some(path) => {
            println!(
                "  {} ollama already installed ({})",
                "✓".green(),
                path.display()
            );
            path
        }
        None if no_install => {
            bail!("ollama is not installed (re-run without --no-install to install it)")
        }
        None => {
            println!("  ollama not found, installing...");
            let path = ollama::install(&policy, &bin_dir).await.context(
                "Failed to install ollama. Manual install: https://ollama.com/download",
            )?;
            warn_if_off_path(&path);
            println!("  {} installed {}", "✓".green(), path.display());
            path
        }
    };
    let ollama_bin = ollama_bin.to_string_lossy().to_string();

    println!("{} Ensuring ollama is serving...", "[2/4]".bold().cyan());
    let api = OllamaApi::new(&config.ollama.host)?;
    if api.is_serving().await {
        println!(
            "  {} service already up at {}",
            "✓".green(),
            config.ollama.host
        );
    } else {
        let log_path = paths::get_serve_log_path()?;
        let pid = service::spawn_serve(&ollama_bin, &config.ollama.host, &log_path)
            .context("Failed to start ollama serve")?;
        debug!("ollama serve spawned, pid {}", pid);

        let deadline = Duration::from_secs(config.ollama.startup_timeout_secs);
        let took = service::wait_for_ready(&config.ollama.host, deadline)
            .await
            .with_context(|| {
                format!("ollama serve did not come up (log: {})", log_path.display())
            })?;
        println!(
            "  {} service ready in {:.1}s",
            "✓".green(),
            took.as_secs_f64()
        );
    }

    let present = api
        .has_model(&config.model)
        .await
        .context("Failed to list local models")?;
    if present {
        println!(
            "  {} model {} already present",
            "✓".green(),
            config.model.cyan()
        );
    } else {
        println!(
            "  Pulling {} (large download, one time)...",
            config.model.cyan()
        );
        ollama::pull_model(&ollama_bin, &config.model).context("Model pull failed")?;
        println!("  {} model {} pulled", "✓".green(), config.model.cyan());
    }

    println!("{} Checking opencode assistant...", "[3/4]".bold().cyan());
    let opencode_bin = match tools::resolve_binary(&config.opencode.binary) {
        Some(path) => {
            println!(
                "  {} opencode already installed ({})",
                "✓".green(),
                path.display()
            );
            path
        }
        None if no_install => {
            bail!("opencode is not installed (re-run without --no-install to install it)")
        }
        None => {
            println!("  opencode not found, installing...");
            let path = opencode::install(&policy, &bin_dir).await.context(
                "Failed to install opencode. Manual install: https://opencode.ai/docs",
            )?;
            warn_if_off_path(&path);
            println!("  {} installed {}", "✓".green(), path.display());
            path
        }
    };

    println!("{} Configuring opencode...", "[4/4]".bold().cyan());
    opencode::configure(
        &opencode_bin.to_string_lossy(),
        &config.opencode.provider,
        &config.model,
    )
    .context("Failed to write opencode configuration")?;
    println!(
        "  {} provider = {}, model = {}",
        "✓".green(),
        config.opencode.provider,
        config.model
    );

    println!(
        "\n{} Environment ready! Start coding with {}",
        "✓".green().bold(),
        "opencode".cyan()
    );
    Ok(())
}

fn warn_if_off_path(binary: &Path) {
    if let Some(dir) = binary.parent() {
        if !paths::dir_on_path(dir) {
            eprintln!(
                "{}: {} is not on your PATH; add it in your shell profile",
                "Warning".yellow(),
                dir.display()
            );
        }
    }
}
