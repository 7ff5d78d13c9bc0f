//! Install candidates and configuration writes for the opencode assistant.

use crate::error::{Result, SetupError};
use crate::install::{self, InstallPolicy, Method};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::info;

/// npm distribution name, distinct from the binary it installs.
const NPM_PACKAGE: &str = "opencode-ai";

/// Install methods in preference order. npm is the supported channel;
/// brew covers hosts without node. Upstream publishes archives rather
/// than single-file binaries, so there is no direct-download fallback.
pub fn install_candidates() -> Vec<Method> {
    vec![
        Method::npm_global(NPM_PACKAGE),
        Method::brew_formula("opencode"),
    ]
}

/// Install opencode with the first method the policy and host allow,
/// returning the path the binary resolves to afterwards.
pub async fn install(policy: &InstallPolicy, bin_dir: &Path) -> Result<PathBuf> {
    let method = install::pick("opencode", &install_candidates(), policy)?;
    info!("Installing opencode via {}", method.describe());
    match method {
        Method::PackageManager { manager, args } => {
            install::run_package_manager(manager, &args)?;
            super::resolve_binary("opencode").ok_or_else(|| SetupError::ToolNotFound {
                tool: "opencode".to_string(),
            })
        }
        Method::Artifact(spec) => install::artifact::install(&spec, bin_dir).await,
    }
}

/// Build a single `opencode config set <key> <value>` invocation.
pub fn build_config_set_command(binary: &str, key: &str, value: &str) -> Command {
    let mut cmd = Command::new(binary);
    cmd.arg("config").arg("set").arg(key).arg(value);
    cmd
}

/// Point opencode at the local provider and model. Each setting goes
/// through the tool's own CLI so its config format stays its concern,
/// and a failed write stops before the next one.
pub fn configure(binary: &str, provider: &str, model: &str) -> Result<()> {
    for (key, value) in [("provider", provider), ("model", model)] {
        info!("Setting opencode {} = {}", key, value);
        let status = build_config_set_command(binary, key, value).status()?;
        if !status.success() {
            return Err(SetupError::CommandFailed {
                program: format!("{binary} config set {key}"),
                code: status.code().unwrap_or(-1),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::install::PackageManager;
    use std::os::unix::fs::PermissionsExt;

    fn get_args(cmd: &Command) -> Vec<String> {
        cmd.get_args()
            .map(|a| a.to_string_lossy().to_string())
            .collect()
    }

    fn write_script(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("fake-opencode");
        std::fs::write(&path, body).unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path
    }

    #[test]
    fn test_config_set_command_shape() {
        let cmd = build_config_set_command("opencode", "provider", "ollama");
        assert_eq!(cmd.get_program(), "opencode");
        assert_eq!(get_args(&cmd), vec!["config", "set", "provider", "ollama"]);
    }

    #[test]
    fn test_candidates_prefer_npm() {
        let candidates = install_candidates();
        let Method::PackageManager { manager, args } = &candidates[0] else {
            panic!("expected a package manager first");
        };
        assert_eq!(*manager, PackageManager::Npm);
        assert_eq!(args, &["install", "-g", "opencode-ai"]);
        assert!(matches!(
            candidates[1],
            Method::PackageManager {
                manager: PackageManager::Brew,
                ..
            }
        ));
    }

    #[test]
    fn test_configure_issues_two_set_calls_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("calls.log");
        let script = write_script(
            dir.path(),
            &format!("#!/bin/sh\necho \"$@\" >> {}\n", log.display()),
        );

        configure(script.to_str().unwrap(), "ollama", "qwen2.5-coder:7b").unwrap();

        let calls = std::fs::read_to_string(&log).unwrap();
        let lines: Vec<&str> = calls.lines().collect();
        assert_eq!(
            lines,
            vec![
                "config set provider ollama",
                "config set model qwen2.5-coder:7b"
            ]
        );
    }

    #[test]
    fn test_configure_stops_on_first_failure() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "#!/bin/sh\nexit 3\n");

        let err = configure(script.to_str().unwrap(), "ollama", "m").unwrap_err();
        match err {
            SetupError::CommandFailed { program, code } => {
                assert!(program.ends_with("config set provider"));
                assert_eq!(code, 3);
            }
            other => panic!("expected CommandFailed, got {other:?}"),
        }
    }
}
