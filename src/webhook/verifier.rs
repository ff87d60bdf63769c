//! Delivery verification against the shared signing secret.

use std::time::{Duration, SystemTime};

use chrono::DateTime;

use super::error::WebhookError;
use super::event::WebhookEvent;
use super::signature::{self, SignatureHeader};
use crate::time::{Clock, SystemClock};

/// Header carrying the delivery signature.
pub const SIGNATURE_HEADER: &str = "x-marble-signature";

/// Header carrying the delivery timestamp. Takes precedence over a
/// timestamp embedded in a composite signature value.
pub const TIMESTAMP_HEADER: &str = "x-marble-timestamp";

/// Verifies inbound webhook deliveries.
///
/// Holds the shared signing secret and the replay tolerance window.
/// Immutable once built; safe to share across handlers.
///
/// # Example
///
/// ```
/// use marble_client::webhook::WebhookVerifier;
///
/// let verifier = WebhookVerifier::new("whsec_example");
/// let body = br#"{"id":"evt_1","type":"post.published"}"#;
/// let digest = verifier.sign(body, None);
///
/// let mut headers = http::HeaderMap::new();
/// headers.insert("x-marble-signature", digest.parse().unwrap());
/// assert!(verifier.verify(body, &headers).is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct WebhookVerifier<C = SystemClock> {
    secret: Vec<u8>,
    tolerance: Duration,
    require_timestamp: bool,
    clock: C,
}

impl WebhookVerifier {
    /// Default replay tolerance window.
    pub const DEFAULT_TOLERANCE: Duration = Duration::from_secs(300);

    /// Creates a verifier with the default tolerance window.
    #[must_use]
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
            tolerance: Self::DEFAULT_TOLERANCE,
            require_timestamp: false,
            clock: SystemClock,
        }
    }
}

impl<C> WebhookVerifier<C> {
    /// Sets the replay tolerance window.
    ///
    /// A zero tolerance disables the timestamp check entirely; the
    /// timestamp still participates in the signed payload when present.
    #[must_use]
    pub const fn with_tolerance(mut self, tolerance: Duration) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Rejects deliveries that carry no timestamp at all.
    #[must_use]
    pub const fn with_required_timestamp(mut self) -> Self {
        self.require_timestamp = true;
        self
    }

    /// Replaces the clock, for tests.
    #[must_use]
    pub fn with_clock<C2: Clock>(self, clock: C2) -> WebhookVerifier<C2> {
        WebhookVerifier {
            secret: self.secret,
            tolerance: self.tolerance,
            require_timestamp: self.require_timestamp,
            clock,
        }
    }

    /// Computes the hex signature for `raw_body`, optionally bound to a
    /// timestamp.
    ///
    /// Produces the digest [`WebhookVerifier::verify`] expects for the
    /// same body and timestamp; useful for building test deliveries.
    #[must_use]
    pub fn sign(&self, raw_body: &[u8], timestamp: Option<&str>) -> String {
        match timestamp {
            Some(ts) => {
                let mut payload = Vec::with_capacity(ts.len() + 1 + raw_body.len());
                payload.extend_from_slice(ts.as_bytes());
                payload.push(b'.');
                payload.extend_from_slice(raw_body);
                signature::hmac_hex(&self.secret, &payload)
            }
            None => signature::hmac_hex(&self.secret, raw_body),
        }
    }
}

impl<C: Clock> WebhookVerifier<C> {
    /// Verifies a delivery's signature and timestamp.
    ///
    /// `raw_body` must be the exact request bytes; any re-serialization
    /// of the JSON breaks the digest.
    ///
    /// # Errors
    ///
    /// One [`WebhookError`] variant per rejection cause; see the enum.
    pub fn verify(
        &self,
        raw_body: &[u8],
        headers: &http::HeaderMap,
    ) -> Result<(), WebhookError> {
        let header = parse_signature_header(headers)?;
        let timestamp = self.resolve_timestamp(headers, &header)?;

        if let Some(ts) = timestamp.as_deref() {
            self.check_window(ts)?;
        }

        let expected = self.sign(raw_body, timestamp.as_deref());
        if signature::digests_match(&expected, &header.digest) {
            Ok(())
        } else {
            Err(WebhookError::InvalidSignature)
        }
    }

    /// Verifies a delivery and parses its event envelope.
    ///
    /// # Errors
    ///
    /// See [`WebhookVerifier::verify`]; additionally
    /// [`WebhookError::InvalidPayload`] when the body is not a
    /// well-formed event.
    pub fn verify_and_parse(
        &self,
        raw_body: &[u8],
        headers: &http::HeaderMap,
    ) -> Result<WebhookEvent, WebhookError> {
        self.verify(raw_body, headers)?;
        serde_json::from_slice(raw_body)
            .map_err(|err| WebhookError::InvalidPayload(err.to_string()))
    }

    /// Picks the effective timestamp: the dedicated header wins over a
    /// composite-embedded one.
    fn resolve_timestamp(
        &self,
        headers: &http::HeaderMap,
        header: &SignatureHeader,
    ) -> Result<Option<String>, WebhookError> {
        if let Some(value) = headers.get(TIMESTAMP_HEADER) {
            let ts = value.to_str().map_err(|_| {
                WebhookError::MalformedHeader(format!("non-ASCII `{TIMESTAMP_HEADER}` value"))
            })?;
            return Ok(Some(ts.to_string()));
        }
        if let Some(ts) = &header.timestamp {
            return Ok(Some(ts.clone()));
        }
        if self.require_timestamp {
            return Err(WebhookError::MissingTimestamp);
        }
        Ok(None)
    }

    /// Rejects timestamps outside the tolerance window, in either
    /// direction. A zero tolerance skips the check and the parse.
    fn check_window(&self, raw: &str) -> Result<(), WebhookError> {
        if self.tolerance.is_zero() {
            return Ok(());
        }

        let delivered = parse_timestamp(raw)
            .ok_or_else(|| WebhookError::TimestampOutOfRange(format!("unparseable `{raw}`")))?;
        let now = epoch_seconds(self.clock.now());

        let skew = now.abs_diff(delivered);
        if skew > self.tolerance.as_secs() {
            return Err(WebhookError::TimestampOutOfRange(format!(
                "skew of {skew}s exceeds tolerance of {}s",
                self.tolerance.as_secs()
            )));
        }
        Ok(())
    }
}

/// Epoch seconds when the value is fully numeric, otherwise an
/// RFC 3339 or RFC 2822 date string.
fn parse_timestamp(raw: &str) -> Option<i64> {
    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        return raw.parse().ok();
    }
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_rfc2822(raw))
        .map(|dt| dt.timestamp())
        .ok()
}

fn epoch_seconds(now: SystemTime) -> i64 {
    match now.duration_since(SystemTime::UNIX_EPOCH) {
        Ok(since) => i64::try_from(since.as_secs()).unwrap_or(i64::MAX),
        Err(_) => 0,
    }
}

fn parse_signature_header(headers: &http::HeaderMap) -> Result<SignatureHeader, WebhookError> {
    let value = headers
        .get(SIGNATURE_HEADER)
        .ok_or(WebhookError::MissingSignature)?;
    let raw = value.to_str().map_err(|_| {
        WebhookError::MalformedHeader(format!("non-ASCII `{SIGNATURE_HEADER}` value"))
    })?;
    SignatureHeader::parse(raw)
}
