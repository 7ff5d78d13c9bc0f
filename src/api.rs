//! Minimal typed client for the local Ollama HTTP API.
//!
//! Only the endpoints the bootstrap guards need: `/api/version` as the
//! serving check and `/api/tags` as the model-presence check.

use crate::error::{Result, SetupError};
use serde::Deserialize;
use std::time::Duration;

/// Per-request timeout; the service is local, so slow answers mean broken.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Deserialize)]
pub struct VersionResponse {
    pub version: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TagsResponse {
    #[serde(default)]
    pub models: Vec<ModelEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelEntry {
    pub name: String,
    #[serde(default)]
    pub size: Option<u64>,
}

#[derive(Clone)]
pub struct OllamaApi {
    inner: reqwest::Client,
    base_url: String,
}

impl OllamaApi {
    /// # Errors
    ///
    /// Returns an error if `base_url` is not a valid URL or the HTTP
    /// client cannot be built.
    pub fn new(base_url: &str) -> Result<Self> {
        url::Url::parse(base_url)?;
        let inner = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            inner,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `/api/version`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not 2xx.
    pub async fn version(&self) -> Result<VersionResponse> {
        self.get_json("/api/version").await
    }

    /// GET `/api/tags`, the locally available models.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not 2xx.
    pub async fn tags(&self) -> Result<TagsResponse> {
        self.get_json("/api/tags").await
    }

    /// Whether the service answers its version endpoint at all.
    pub async fn is_serving(&self) -> bool {
        self.version().await.is_ok()
    }

    /// Whether `name` is already present locally, applying Ollama's
    /// implicit `:latest` tag.
    ///
    /// # Errors
    ///
    /// Returns an error if the tags request fails.
    pub async fn has_model(&self, name: &str) -> Result<bool> {
        let tags = self.tags().await?;
        Ok(tags.models.iter().any(|m| model_matches(name, &m.name)))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.inner.get(&url).send().await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;

        if !status.is_success() {
            return Err(SetupError::UnexpectedStatus {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        serde_json::from_slice(&bytes).map_err(SetupError::from)
    }
}

/// Compare a requested model name against a local tag name. A bare name
/// means `:latest` on both sides.
pub fn model_matches(want: &str, have: &str) -> bool {
    normalize(want) == normalize(have)
}

fn normalize(name: &str) -> String {
    if name.contains(':') {
        name.to_string()
    } else {
        format!("{name}:latest")
    }
}
