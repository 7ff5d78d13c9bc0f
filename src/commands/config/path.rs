use anyhow::Result;
use std::path::PathBuf;

pub async fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config_manager = crate::commands::manager(config_path)?;
    println!("{}", config_manager.get_config_path().display());
    Ok(())
}
