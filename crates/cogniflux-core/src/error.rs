//! Error types for Cogniflux core services (LLM client, telemetry, configuration).

use thiserror::Error;

/// Result type alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Missing API key: set {0}")]
    MissingApiKey(&'static str),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream error {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Response parse failed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Empty response from model")]
    EmptyResponse,
}
