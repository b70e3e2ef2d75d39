//! Error types for the SnapShell CLI

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for SnapShell operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No input provided. Use --file or pipe content to stdin.")]
    EmptyInput,

    #[error("Failed to read {path}: {source}")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from the snapshot API exchange
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication expired or invalid. Please re-authenticate:\n  snapshell login")]
    Unauthorized,

    #[error("API error ({code}): {body}")]
    Status { code: u16, body: String },

    #[error("Could not reach {endpoint}: {source}. Make sure the server is running.")]
    Network {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

/// Errors from the browser login flow
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Could not start local callback server: {0}")]
    Transport(#[source] std::io::Error),

    #[error("Invalid API URL '{url}': {reason}")]
    InvalidApiUrl { url: String, reason: String },

    #[error(
        "Timed out after {0}s waiting for browser login. Re-run `snapshell login` to try again."
    )]
    Timeout(u64),

    #[error("Login was interrupted before a token arrived")]
    Interrupted,
}

/// Errors reading or writing the credential file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read credentials at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to save credentials to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Credential file at {path} is malformed: {reason}")]
    Malformed { path: PathBuf, reason: String },

    #[error("Could not determine home directory")]
    NoHomeDir,
}
