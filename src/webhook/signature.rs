//! Signature header parsing and digest computation.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::error::WebhookError;

type HmacSha256 = Hmac<Sha256>;

/// Parsed `x-marble-signature` header value.
///
/// The wire carries either a bare hex digest or a composite value of
/// comma-separated `key=value` parts, `t=<timestamp>,v1=<hex>`. Part
/// order is not significant and unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Timestamp embedded in a composite header, if any.
    pub timestamp: Option<String>,
    /// Hex-encoded HMAC-SHA256 digest.
    pub digest: String,
}

impl SignatureHeader {
    /// Parses a raw header value.
    ///
    /// # Errors
    ///
    /// Fails with [`WebhookError::MalformedHeader`] when the value is
    /// empty or a composite form carries no `v1` part.
    pub fn parse(raw: &str) -> Result<Self, WebhookError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(WebhookError::MalformedHeader(
                "empty signature value".to_string(),
            ));
        }

        // A bare digest never contains `=`.
        if !raw.contains('=') {
            return Ok(Self {
                timestamp: None,
                digest: raw.to_string(),
            });
        }

        let mut timestamp = None;
        let mut digest = None;
        for part in raw.split(',') {
            match part.trim().split_once('=') {
                Some(("t", value)) => timestamp = Some(value.to_string()),
                Some(("v1", value)) => digest = Some(value.to_string()),
                // Unknown keys are reserved for future scheme versions.
                Some(_) => {}
                None => {
                    return Err(WebhookError::MalformedHeader(format!(
                        "part `{part}` is not `key=value`"
                    )));
                }
            }
        }

        digest.map_or_else(
            || {
                Err(WebhookError::MalformedHeader(
                    "composite value has no `v1` part".to_string(),
                ))
            },
            |digest| Ok(Self { timestamp, digest }),
        )
    }
}

/// Computes the hex-encoded HMAC-SHA256 digest of `payload`.
pub(crate) fn hmac_hex(secret: &[u8], payload: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret)
        .expect("HMAC-SHA256 accepts keys of any length");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Compares two hex digests in constant time.
///
/// Length is checked first; comparing digests of different lengths
/// leaks nothing an attacker does not already know.
pub(crate) fn digests_match(expected: &str, provided: &str) -> bool {
    let provided = provided.to_ascii_lowercase();
    if expected.len() != provided.len() {
        return false;
    }
    expected.as_bytes().ct_eq(provided.as_bytes()).into()
}
