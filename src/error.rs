//! Error types for chatrelay
//!
//! This module defines the error types used throughout the application.
//! The `Display` form of `RelayError` is exactly what appears after
//! `LOST ` on the output stream.

use thiserror::Error;

/// Terminal failures of a chat session
///
/// Any of these ends the process: there are no retries. Expected
/// end-of-stream conditions are not errors; they are modeled as
/// [`EndReason`].
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("provider error: {0}")]
    Provider(String),

    #[error("upstream error {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Expected end-of-stream conditions, mapped to a success exit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// The stream finished and its chat closed
    Finished,
    /// The chat never had content, or is unavailable for an ended stream
    NoContent,
}

/// Result type alias for convenience
pub type RelayResult<T> = Result<T, RelayError>;
