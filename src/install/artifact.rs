//! Checksum-verified artifact fetch.
//!
//! Downloads a single-file executable over HTTPS, hashing while streaming,
//! and refuses to install anything whose SHA-256 does not match the entry
//! in the release's checksum manifest. Archive-packaged releases are not
//! handled here; those targets go through a package manager instead.

use crate::error::{Result, SetupError};
use crate::utils::paths;
use futures::StreamExt;
use sha2::{Digest, Sha256};
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct ArtifactSpec {
    /// Display name used in messages
    pub tool: String,
    /// Release download base, no trailing slash needed
    pub base_url: String,
    /// Artifact file name for the host target
    pub file: String,
    /// Checksum manifest published alongside the artifact
    pub checksum_file: String,
    /// Name the binary is installed under in `bin_dir`
    pub bin_name: String,
}

impl ArtifactSpec {
    pub fn artifact_url(&self) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), self.file)
    }

    pub fn checksum_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.checksum_file
        )
    }
}

/// Find the hex digest for `file` in a `sha256sum`-style manifest
/// (`<hex>  <name>` per line, `*` binary-mode markers tolerated).
///
/// # Errors
///
/// Returns [`SetupError::ChecksumMissing`] if no line names `file`.
pub fn parse_checksum_manifest(manifest: &str, file: &str) -> Result<String> {
    for line in manifest.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut parts = line.split_whitespace();
        let (Some(hex), Some(name)) = (parts.next(), parts.next()) else {
            continue;
        };
        let name = name.trim_start_matches('*');
        if name == file || name.ends_with(&format!("/{file}")) {
            return Ok(hex.to_ascii_lowercase());
        }
    }
    Err(SetupError::ChecksumMissing {
        file: file.to_string(),
    })
}

/// Download, verify, and install the artifact as `bin_dir/{bin_name}`.
/// The body streams to a `.part` file that only becomes the real binary
/// after the digest matches; any failure removes the partial download.
///
/// # Errors
///
/// Returns an error on any network failure, a missing manifest entry, a
/// digest mismatch, or filesystem trouble in `bin_dir`.
pub async fn install(spec: &ArtifactSpec, bin_dir: &Path) -> Result<PathBuf> {
    let client = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .build()?;

    // Manifest first: a missing checksum should fail before any large download.
    let manifest = fetch_text(&client, &spec.checksum_url()).await?;
    let expected = parse_checksum_manifest(&manifest, &spec.file)?;
    debug!("Expecting sha256 {} for {}", expected, spec.file);

    paths::ensure_dir(bin_dir)?;
    let dest = bin_dir.join(&spec.bin_name);
    let part = bin_dir.join(format!(".{}.part", spec.bin_name));

    info!("Downloading {}", spec.artifact_url());
    let resp = client.get(spec.artifact_url()).send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(SetupError::UnexpectedStatus {
            status: status.as_u16(),
            body: resp.text().await.unwrap_or_default(),
        });
    }

    // Nothing past this point may leave the partial file behind.
    let result = download_and_place(resp, spec, &expected, &part, &dest).await;
    if result.is_err() {
        let _ = std::fs::remove_file(&part);
    }
    result
}

async fn download_and_place(
    resp: reqwest::Response,
    spec: &ArtifactSpec,
    expected: &str,
    part: &Path,
    dest: &Path,
) -> Result<PathBuf> {
    let mut hasher = Sha256::new();
    let mut out = std::fs::File::create(part)?;
    let mut stream = resp.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        hasher.update(&chunk);
        out.write_all(&chunk)?;
    }
    out.flush()?;
    drop(out);

    let actual = format!("{:x}", hasher.finalize());
    if actual != *expected {
        return Err(SetupError::ChecksumMismatch {
            file: spec.file.clone(),
            expected: expected.to_string(),
            actual,
        });
    }

    let mut perms = std::fs::metadata(part)?.permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(part, perms)?;
    std::fs::rename(part, dest)?;

    info!("Installed {} to {}", spec.tool, dest.display());
    Ok(dest.to_path_buf())
}

async fn fetch_text(client: &reqwest::Client, url: &str) -> Result<String> {
    let resp = client.get(url).send().await?;
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        return Err(SetupError::UnexpectedStatus {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}
