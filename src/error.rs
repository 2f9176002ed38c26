//! Error types for the pipe
//!
//! Every failure the adapter can hit is represented here. `Pipe::pipe`
//! flattens them into the caller-facing error string at the very end.

use reqwest::StatusCode;

/// Placeholder used when an upstream error response carries no body.
const NO_RESPONSE_CONTENT: &str = "No response content";

/// Placeholder used when a failure left no partial response text behind.
const NO_PARTIAL_TEXT: &str = "N/A";

/// Adapter-wide error types
#[derive(Debug, thiserror::Error)]
pub enum PipeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),

    /// Upstream answered with a non-success status.
    #[error("HTTP status {status} ({body})")]
    Status { status: StatusCode, body: String },

    /// Transport or decode failure outside the HTTP status space.
    #[error("{message} ({partial})")]
    Request { message: String, partial: String },
}

impl PipeError {
    /// Build a `Status` error, substituting a placeholder for an empty body.
    pub fn status(status: StatusCode, body: String) -> Self {
        let body = if body.is_empty() {
            NO_RESPONSE_CONTENT.to_string()
        } else {
            body
        };
        PipeError::Status { status, body }
    }

    /// Build a `Request` error, substituting a placeholder when no partial
    /// response text exists.
    pub fn request(message: impl Into<String>, partial: Option<String>) -> Self {
        let partial = partial
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| NO_PARTIAL_TEXT.to_string());
        PipeError::Request {
            message: message.into(),
            partial,
        }
    }
}

/// Result type alias for pipe operations
pub type PipeResult<T> = Result<T, PipeError>;
