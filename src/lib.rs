//! Bootstrap a local AI coding environment.
//!
//! One idempotent sequence: the Ollama runtime installed and serving, a
//! model pulled into its local store, and the OpenCode assistant installed
//! and configured to use Ollama as its provider. Every mutating step is
//! guarded by an existence or readiness check, so running it again on a
//! prepared host does nothing.

#![deny(rust_2018_idioms)]

// Unix-only support
#[cfg(not(unix))]
compile_error!(
    "localcode only supports Unix-like platforms (Linux/macOS). Windows is not supported."
);

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod install;
pub mod service;
pub mod tools;
pub mod utils;

// Re-exports
pub use crate::config::{Config, ConfigManager};
pub use crate::error::{Result, SetupError};

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
