//! Error types for AuditScout.

use thiserror::Error;

/// Result type alias for scan, publish and settings operations.
pub type ScoutResult<T> = Result<T, ScoutError>;

/// Errors surfaced to the caller. Per-timeframe generation failures never leave the
/// report generator; they are folded into an `error` report item instead.
#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("{0} is missing")]
    MissingCredential(&'static str),

    #[error("{0}")]
    Generation(String),

    #[error("No completed reports to publish.")]
    NothingToPublish,

    #[error("{0}")]
    Publish(String),

    #[error("A scan is already running")]
    ScanInProgress,

    #[error("Settings storage error: {0}")]
    Storage(#[from] sled::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
