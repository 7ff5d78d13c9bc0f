//! Install strategies for missing tools.
//!
//! The piped install-script pattern is deliberately absent: a tool is
//! installed either through an explicit package-manager invocation or
//! through a checksum-verified artifact fetch ([`artifact`]).

pub mod artifact;

use crate::error::{Result, SetupError};
use std::process::{Command, Stdio};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Npm,
    Brew,
}

impl PackageManager {
    pub fn binary(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Brew => "brew",
        }
    }

    pub fn is_available(&self) -> bool {
        which::which(self.binary()).is_ok()
    }
}

impl std::fmt::Display for PackageManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.binary())
    }
}

/// A concrete way to install one tool.
#[derive(Debug, Clone)]
pub enum Method {
    PackageManager {
        manager: PackageManager,
        args: Vec<String>,
    },
    Artifact(artifact::ArtifactSpec),
}

impl Method {
    /// `npm install -g <package>`
    pub fn npm_global(package: &str) -> Self {
        Method::PackageManager {
            manager: PackageManager::Npm,
            args: vec!["install".into(), "-g".into(), package.into()],
        }
    }

    /// `brew install <formula>`
    pub fn brew_formula(formula: &str) -> Self {
        Method::PackageManager {
            manager: PackageManager::Brew,
            args: vec!["install".into(), formula.into()],
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Method::PackageManager { manager, args } => {
                format!("{} {}", manager.binary(), args.join(" "))
            }
            Method::Artifact(spec) => format!("verified download of {}", spec.artifact_url()),
        }
    }
}

/// What install categories the configuration permits.
#[derive(Debug, Clone, Copy)]
pub struct InstallPolicy {
    pub allow_package_manager: bool,
    pub allow_artifact: bool,
}

impl From<&crate::config::InstallConfig> for InstallPolicy {
    fn from(cfg: &crate::config::InstallConfig) -> Self {
        Self {
            allow_package_manager: cfg.allow_package_manager,
            allow_artifact: cfg.allow_artifact,
        }
    }
}

/// Pick the first eligible candidate: its category must be allowed and,
/// for package managers, the manager must be on PATH.
///
/// # Errors
///
/// Returns [`SetupError::InstallUnavailable`] naming everything that was
/// considered when no candidate is eligible.
pub fn pick(tool: &str, candidates: &[Method], policy: &InstallPolicy) -> Result<Method> {
    pick_with(tool, candidates, policy, PackageManager::is_available)
}

fn pick_with(
    tool: &str,
    candidates: &[Method],
    policy: &InstallPolicy,
    manager_available: impl Fn(&PackageManager) -> bool,
) -> Result<Method> {
    let mut tried = Vec::new();

    for candidate in candidates {
        match candidate {
            Method::PackageManager { manager, .. } => {
                if !policy.allow_package_manager {
                    tried.push(format!("{manager} (disabled by config)"));
                } else if !manager_available(manager) {
                    tried.push(format!("{manager} (not on PATH)"));
                } else {
                    return Ok(candidate.clone());
                }
            }
            Method::Artifact(_) => {
                if !policy.allow_artifact {
                    tried.push("artifact download (disabled by config)".to_string());
                } else {
                    return Ok(candidate.clone());
                }
            }
        }
    }

    Err(SetupError::InstallUnavailable {
        tool: tool.to_string(),
        tried: if tried.is_empty() {
            "no install methods defined".to_string()
        } else {
            tried.join(", ")
        },
    })
}

/// Build the package-manager invocation without running it.
pub fn build_package_manager_command(manager: PackageManager, args: &[String]) -> Command {
    let mut cmd = Command::new(manager.binary());
    cmd.args(args);
    cmd
}

/// Run a package-manager install with inherited stdio so the user sees
/// the manager's own output.
///
/// # Errors
///
/// Returns [`SetupError::CommandFailed`] on a non-zero exit.
pub fn run_package_manager(manager: PackageManager, args: &[String]) -> Result<()> {
    info!("Running {} {}", manager.binary(), args.join(" "));
    let status = build_package_manager_command(manager, args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()?;

    if !status.success() {
        return Err(SetupError::CommandFailed {
            program: manager.binary().to_string(),
            code: status.code().unwrap_or(-1),
        });
    }
    Ok(())
}
