mod manager;
mod types;

pub use manager::ConfigManager;
pub use types::{
    Config, InstallConfig, OllamaConfig, OpencodeConfig, DEFAULT_MODEL, DEFAULT_OLLAMA_HOST,
};
