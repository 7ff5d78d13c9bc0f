//! Model-runtime service lifecycle: detached spawn and readiness probing.
//!
//! The serve process is meant to outlive the bootstrap, so it gets its own
//! process group and a log file instead of kill-on-drop management.

use crate::error::{Result, SetupError};
use crate::utils::paths;
use std::fs::OpenOptions;
use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Poll interval between readiness probes.
const PROBE_INTERVAL: Duration = Duration::from_millis(250);
/// Per-probe request timeout; probes against a booting service hang otherwise.
const PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// Spawn `{binary} serve` detached, binding the address of `base_url`,
/// with both output streams appended to `log_path`. Returns the child pid.
///
/// # Errors
///
/// Returns an error if `base_url` has no usable host, the log file
/// cannot be opened, or the process cannot be spawned.
pub fn spawn_serve(binary: &str, base_url: &str, log_path: &Path) -> Result<u32> {
    let bind = bind_addr(base_url)?;
    if let Some(parent) = log_path.parent() {
        paths::ensure_dir(parent)?;
    }
    let log = OpenOptions::new().create(true).append(true).open(log_path)?;
    let log_err = log.try_clone()?;

    let child = Command::new(binary)
        .arg("serve")
        .env("OLLAMA_HOST", &bind)
        .stdin(Stdio::null())
        .stdout(Stdio::from(log))
        .stderr(Stdio::from(log_err))
        .process_group(0)
        .spawn()?;

    let pid = child.id();
    info!(
        "Spawned '{} serve' on {} (pid {}), logging to {}",
        binary,
        bind,
        pid,
        log_path.display()
    );
    Ok(pid)
}

/// `host:port` for the serve process, from the configured base URL. The
/// runtime reads its bind address from the `OLLAMA_HOST` environment
/// variable, so it must match where the probe polls.
fn bind_addr(base_url: &str) -> Result<String> {
    let url = url::Url::parse(base_url)?;
    let host = url.host().ok_or_else(|| SetupError::ConfigInvalid {
        message: format!("no host in service URL {base_url}"),
    })?;
    let port = url.port_or_known_default().unwrap_or(11434);
    Ok(format!("{host}:{port}"))
}

/// Poll `{base_url}/api/version` until it answers 2xx or `timeout` elapses.
/// Returns how long readiness took.
///
/// # Errors
///
/// Returns [`SetupError::ServiceTimeout`] if the deadline passes without a
/// successful response.
pub async fn wait_for_ready(base_url: &str, timeout: Duration) -> Result<Duration> {
    let client = reqwest::Client::builder().timeout(PROBE_TIMEOUT).build()?;
    let url = format!("{}/api/version", base_url.trim_end_matches('/'));
    let start = Instant::now();

    loop {
        match client.get(&url).send().await {
            Ok(resp) if resp.status().is_success() => {
                let took = start.elapsed();
                debug!("Service ready after {:?}", took);
                return Ok(took);
            }
            Ok(resp) => {
                debug!("Probe got status {}", resp.status());
            }
            Err(e) => {
                debug!("Probe failed: {}", e);
            }
        }

        if start.elapsed() >= timeout {
            return Err(SetupError::ServiceTimeout {
                secs: timeout.as_secs(),
            });
        }
        tokio::time::sleep(PROBE_INTERVAL).await;
    }
}
