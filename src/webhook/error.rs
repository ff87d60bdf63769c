//! Error types for webhook verification.

use thiserror::Error;

/// Error type for webhook verification.
///
/// Every variant is terminal; a delivery that fails verification must
/// be rejected, never retried against a different interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebhookError {
    /// The signature header is absent.
    #[error("missing `x-marble-signature` header")]
    MissingSignature,

    /// The signature header is present but unreadable.
    #[error("malformed signature header: {0}")]
    MalformedHeader(String),

    /// A timestamp is required but no header or embedded value carries one.
    #[error("missing delivery timestamp")]
    MissingTimestamp,

    /// The delivery timestamp is unparseable or outside the tolerance
    /// window.
    #[error("delivery timestamp out of range: {0}")]
    TimestampOutOfRange(String),

    /// The computed digest does not match the provided one.
    #[error("signature mismatch")]
    InvalidSignature,

    /// The body verified but is not a well-formed event envelope.
    #[error("invalid event payload: {0}")]
    InvalidPayload(String),
}
