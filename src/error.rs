//! Error types surfaced by client operations.

use thiserror::Error;

use crate::transport::TransportError;

/// Structural mismatch between a response payload and the expected shape.
///
/// Carries the offending field path so callers can see which part of the
/// envelope failed to normalize. Shape errors are always terminal; the
/// retry policy is never consulted for them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid shape at `{path}`: {message}")]
pub struct ShapeError {
    /// Dotted path of the field that failed to normalize.
    pub path: String,
    /// Description of the mismatch.
    pub message: String,
}

impl ShapeError {
    /// Creates a shape error for the given field path.
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Error type for client operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid construction-time configuration (base URL, API key).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Transport failure with no usable response, surfaced after the
    /// retry policy declined to continue.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Terminal non-2xx response.
    ///
    /// `body` holds the error payload parsed as JSON when possible,
    /// falling back to the raw text, or `None` when the body was empty
    /// or undecodable.
    #[error("HTTP {status} {status_text}")]
    Http {
        /// Response status code.
        status: http::StatusCode,
        /// Canonical reason phrase for the status.
        status_text: String,
        /// Error payload, if any.
        body: Option<serde_json::Value>,
    },

    /// Response payload did not match the expected structure.
    #[error("invalid response shape: {0}")]
    InvalidShape(#[from] ShapeError),

    /// The operation's cancellation token fired.
    ///
    /// Distinguished from every other kind so callers can tell "the
    /// caller gave up" from "the request failed".
    #[error("operation cancelled")]
    Cancelled,
}

impl Error {
    /// Returns true if this error was caused by cancellation.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
