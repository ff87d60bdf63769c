//! Verification of inbound webhook deliveries.
//!
//! Marble signs each delivery with HMAC-SHA256 over the raw request
//! body. This module provides:
//! - Signature header parsing ([`SignatureHeader`])
//! - Delivery verification and signing ([`WebhookVerifier`])
//! - The verified event envelope ([`WebhookEvent`])

mod error;
mod event;
mod signature;
mod verifier;


pub use error::WebhookError;
pub use event::WebhookEvent;
pub use signature::SignatureHeader;
pub use verifier::{SIGNATURE_HEADER, TIMESTAMP_HEADER, WebhookVerifier};
