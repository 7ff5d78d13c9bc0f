use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Model pulled and configured when the user has not chosen one.
pub const DEFAULT_MODEL: &str = "qwen2.5-coder:7b";

/// Base URL of a locally serving Ollama instance.
pub const DEFAULT_OLLAMA_HOST: &str = "http://127.0.0.1:11434";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub version: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub ollama: OllamaConfig,
    #[serde(default)]
    pub opencode: OpencodeConfig,
    #[serde(default)]
    pub install: InstallConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            model: default_model(),
            ollama: OllamaConfig::default(),
            opencode: OpencodeConfig::default(),
            install: InstallConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Executable name or path looked up before each runtime step
    #[serde(default = "default_ollama_binary")]
    pub binary: String,
    /// Base URL the serve process listens on
    #[serde(default = "default_ollama_host")]
    pub host: String,
    /// Readiness probe deadline after spawning `ollama serve`
    #[serde(default = "default_startup_timeout_secs")]
    pub startup_timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            binary: default_ollama_binary(),
            host: default_ollama_host(),
            startup_timeout_secs: default_startup_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpencodeConfig {
    #[serde(default = "default_opencode_binary")]
    pub binary: String,
    /// Provider key written through `opencode config set`
    #[serde(default = "default_provider")]
    pub provider: String,
}

impl Default for OpencodeConfig {
    fn default() -> Self {
        Self {
            binary: default_opencode_binary(),
            provider: default_provider(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallConfig {
    /// Permit npm/brew installs for missing tools
    #[serde(default = "default_true")]
    pub allow_package_manager: bool,
    /// Permit checksum-verified artifact downloads for missing tools
    #[serde(default = "default_true")]
    pub allow_artifact: bool,
    /// Where fetched binaries land (defaults to ~/.local/bin)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bin_dir: Option<PathBuf>,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            allow_package_manager: true,
            allow_artifact: true,
            bin_dir: None,
        }
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_ollama_binary() -> String {
    "ollama".to_string()
}

fn default_ollama_host() -> String {
    DEFAULT_OLLAMA_HOST.to_string()
}

fn default_startup_timeout_secs() -> u64 {
    30
}

fn default_opencode_binary() -> String {
    "opencode".to_string()
}

fn default_provider() -> String {
    "ollama".to_string()
}

fn default_true() -> bool {
    true
}
