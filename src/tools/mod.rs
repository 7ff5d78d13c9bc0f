//! Per-tool install candidates and process invocations.

pub mod ollama;
pub mod opencode;

use crate::utils::paths;
use std::path::{Path, PathBuf};
use which::which;

/// Resolve a configured binary. Bare names go through a PATH lookup;
/// anything containing a separator is treated as a filesystem path
/// (tilde expanded) and checked directly.
pub fn resolve_binary(binary: &str) -> Option<PathBuf> {
    if binary.contains(std::path::MAIN_SEPARATOR) {
        let expanded = paths::expand_path(Path::new(binary)).ok()?;
        return expanded.is_file().then_some(expanded);
    }
    which(binary).ok()
}

/// Best-effort `<binary> --version`, trimmed first line of stdout.
pub fn probe_version(binary: &str) -> Option<String> {
    let output = std::process::Command::new(binary)
        .arg("--version")
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    let line = stdout.lines().next()?.trim();
    (!line.is_empty()).then(|| line.to_string())
}
