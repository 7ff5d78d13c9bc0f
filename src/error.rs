use thiserror::Error;

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Required tool not found: {tool}")]
    ToolNotFound { tool: String },

    #[error("No install method available for {tool}: {tried}")]
    InstallUnavailable { tool: String, tried: String },

    #[error("{program} exited with status {code}")]
    CommandFailed { program: String, code: i32 },

    #[error("Checksum mismatch for {file}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        file: String,
        expected: String,
        actual: String,
    },

    #[error("No checksum entry for {file} in manifest")]
    ChecksumMissing { file: String },

    #[error("Service did not become ready within {secs}s")]
    ServiceTimeout { secs: u64 },

    #[error("Service not reachable at {url}")]
    ServiceUnreachable { url: String },

    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Invalid configuration: {message}")]
    ConfigInvalid { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, SetupError>;
