use crate::api::OllamaApi;
use crate::error::SetupError;
use crate::tools::{self, ollama};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

/// Fetch one model through the runtime's own pull, skipping the download
/// when the model is already in the local store. Requires a reachable
/// service; starting one is `up`'s job.
pub async fn execute(config_path: Option<PathBuf>, model: Option<String>) -> Result<()> {
    let config_manager = super::manager(config_path)?;
    let config = config_manager.load_or_default();
    let model = model.unwrap_or(config.model);

    let ollama_bin = tools::resolve_binary(&config.ollama.binary)
        .ok_or(SetupError::ToolNotFound {
            tool: config.ollama.binary.clone(),
        })
        .with_context(|| format!("Install the runtime first with '{}'", "localcode up".cyan()))?;

    let api = OllamaApi::new(&config.ollama.host)?;
    if !api.is_serving().await {
        return Err(SetupError::ServiceUnreachable {
            url: config.ollama.host.clone(),
        })
        .with_context(|| format!("Start the service with '{}'", "localcode up".cyan()));
    }

    if api
        .has_model(&model)
        .await
        .context("Failed to list local models")?
    {
        println!("{} Model {} already present", "✓".green(), model.cyan());
        return Ok(());
    }

    ollama::pull_model(&ollama_bin.to_string_lossy(), &model)
        .with_context(|| format!("Failed to pull {model}"))?;
    println!("{} Model {} pulled", "✓".green(), model.cyan());
    Ok(())
}
