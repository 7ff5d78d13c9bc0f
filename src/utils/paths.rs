use anyhow::Result;
use std::path::{Path, PathBuf};

/// Expand tilde (~) in paths to home directory
pub fn expand_path(path: &Path) -> Result<PathBuf> {
    let path_str = path.to_string_lossy();

    if let Some(stripped) = path_str.strip_prefix("~/") {
        let home = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
        Ok(home.join(stripped))
    } else if path_str == "~" {
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))
    } else {
        Ok(path.to_path_buf())
    }
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Get the localcode configuration file path
pub fn get_config_path() -> Result<PathBuf> {
    let base = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    Ok(base.join("localcode").join("config.json"))
}

/// Get the localcode data directory (service logs live here)
pub fn get_data_dir() -> Result<PathBuf> {
    let base = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(base.join("localcode"))
}

/// Get the log file the managed `ollama serve` process writes to
pub fn get_serve_log_path() -> Result<PathBuf> {
    Ok(get_data_dir()?.join("ollama-serve.log"))
}

/// Default directory for binaries installed by the artifact fetcher
pub fn default_bin_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
    Ok(home.join(".local").join("bin"))
}

/// Check whether a directory is on the current PATH
pub fn dir_on_path(dir: &Path) -> bool {
    let Some(path_var) = std::env::var_os("PATH") else {
        return false;
    };
    std::env::split_paths(&path_var).any(|entry| entry == dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_expand_path() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(expand_path(Path::new("~/test")).unwrap(), home.join("test"));
        assert_eq!(expand_path(Path::new("~")).unwrap(), home);

        assert_eq!(
            expand_path(Path::new("/tmp/test")).unwrap(),
            PathBuf::from("/tmp/test")
        );

        assert_eq!(
            expand_path(Path::new("test")).unwrap(),
            PathBuf::from("test")
        );
    }

    #[test]
    fn test_ensure_dir_creates_nested() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");

        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());

        // Second call is a no-op
        ensure_dir(&nested).unwrap();
    }

    #[test]
    fn test_config_path_ends_with_expected_components() {
        let path = get_config_path().unwrap();
        assert!(path.ends_with("localcode/config.json"));
    }

    #[test]
    #[serial]
    fn test_dir_on_path() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!dir_on_path(dir.path()));

        let original = std::env::var_os("PATH");
        let mut parts: Vec<PathBuf> = original
            .as_ref()
            .map(|p| std::env::split_paths(p).collect())
            .unwrap_or_default();
        parts.push(dir.path().to_path_buf());
        let joined = std::env::join_paths(parts).unwrap();
        // SAFETY: serial_test ensures no concurrent env access
        unsafe {
            std::env::set_var("PATH", &joined);
        }

        assert!(dir_on_path(dir.path()));

        // SAFETY: serial_test ensures no concurrent env access
        unsafe {
            match original {
                Some(p) => std::env::set_var("PATH", p),
                None => std::env::remove_var("PATH"),
            }
        }
    }
}
