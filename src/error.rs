//! Sanitization error types.

use thiserror::Error;

/// Errors produced while guarding an SVG upload.
///
/// Every variant is terminal for the current upload: nothing is retried, and
/// the original file is never accepted once any stage has failed. Messages
/// are written to be surfaced to the end user through the host's
/// upload-error channel.
#[derive(Debug, Error)]
pub enum GuardError {
    #[error("could not read uploaded file: {0}")]
    UnreadableFile(#[source] std::io::Error),

    #[error("invalid SVG markup: {0}")]
    InvalidMarkup(String),

    #[error("file could not be sanitized: {0}")]
    Unsanitizable(String),

    #[error("could not write sanitized file: {0}")]
    WriteFailure(#[source] std::io::Error),

    #[error("file too large: {size} bytes (max {max} bytes)")]
    TooLarge { size: usize, max: usize },

    #[error("SVG upload not permitted: {0}")]
    NotPermitted(String),
}

/// Result type alias using GuardError.
pub type GuardResult<T> = Result<T, GuardError>;
