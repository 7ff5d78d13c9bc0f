//! Install candidates and process invocations for the ollama runtime.

use crate::error::{Result, SetupError};
use crate::install::{self, InstallPolicy, Method, artifact::ArtifactSpec};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::info;

const RELEASE_BASE: &str = "https://github.com/ollama/ollama/releases/latest/download";
const CHECKSUM_FILE: &str = "sha256sum.txt";

/// Release file for the host target, where upstream publishes a plain
/// single-file binary. macOS releases ship an app bundle, so that
/// platform installs through a package manager instead.
fn artifact_file() -> Option<&'static str> {
    if cfg!(all(target_os = "linux", target_arch = "x86_64")) {
        Some("ollama-linux-amd64")
    } else if cfg!(all(target_os = "linux", target_arch = "aarch64")) {
        Some("ollama-linux-arm64")
    } else {
        None
    }
}

/// Install methods in preference order.
pub fn install_candidates() -> Vec<Method> {
    let mut candidates = vec![Method::brew_formula("ollama")];
    if let Some(file) = artifact_file() {
        candidates.push(Method::Artifact(ArtifactSpec {
            tool: "ollama".to_string(),
            base_url: RELEASE_BASE.to_string(),
            file: file.to_string(),
            checksum_file: CHECKSUM_FILE.to_string(),
            bin_name: "ollama".to_string(),
        }));
    }
    candidates
}

/// Install ollama with the first method the policy and host allow,
/// returning the path the binary resolves to afterwards.
pub async fn install(policy: &InstallPolicy, bin_dir: &Path) -> Result<PathBuf> {
    let method = install::pick("ollama", &install_candidates(), policy)?;
    info!("Installing ollama via {}", method.describe());
    match method {
        Method::PackageManager { manager, args } => {
            install::run_package_manager(manager, &args)?;
            super::resolve_binary("ollama").ok_or_else(|| SetupError::ToolNotFound {
                tool: "ollama".to_string(),
            })
        }
        Method::Artifact(spec) => install::artifact::install(&spec, bin_dir).await,
    }
}

/// Build `ollama pull <model>`. Stdio is inherited so the layer progress
/// bars stay on the user's terminal.
pub fn build_pull_command(binary: &str, model: &str) -> Command {
    let mut cmd = Command::new(binary);
    cmd.arg("pull").arg(model);
    cmd
}

/// Run a blocking model pull.
pub fn pull_model(binary: &str, model: &str) -> Result<()> {
    info!("Pulling model {} with {}", model, binary);
    let status = build_pull_command(binary, model).status()?;
    if !status.success() {
        return Err(SetupError::CommandFailed {
            program: format!("{binary} pull {model}"),
            code: status.code().unwrap_or(-1),
        });
    }
    Ok(())
}
