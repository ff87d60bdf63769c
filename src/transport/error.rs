//! Error types for the transport boundary.

use thiserror::Error;

/// Error type for transport failures where no usable response arrived.
///
/// Describes what went wrong without dictating recovery strategy; the
/// retry policy decides whether a given failure is worth another
/// attempt.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    ///
    /// This includes DNS resolution failures, connection refused, and
    /// other network-level errors.
    #[error("connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The server did not respond within the transport's timeout.
    #[error("request timed out")]
    Timeout,

    /// The request URL could not be built or parsed.
    ///
    /// A configuration problem, not a transient failure.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request's cancellation token fired mid-flight.
    #[error("request cancelled")]
    Cancelled,
}
