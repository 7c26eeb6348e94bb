//! Error types for the anylist client.

use thiserror::Error;

/// Errors that can occur in anylist operations.
#[derive(Error, Debug)]
pub enum AnyListError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode protobuf payload: {0}")]
    Decode(#[from] prost::DecodeError),
}

/// Result type alias for anylist operations.
pub type AnyListResult<T> = Result<T, AnyListError>;
