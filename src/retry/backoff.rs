//! Pure backoff computation and Retry-After parsing.

use std::time::{Duration, SystemTime};

use rand::Rng;

/// Computes the exponential backoff for a 1-based attempt number.
///
/// The delay doubles per attempt, `base * 2^(attempt - 1)`, saturating
/// rather than overflowing, and is capped at `cap`.
#[must_use]
pub fn compute_backoff(attempt: u32, base: Duration, cap: Duration) -> Duration {
    // Exponents past 32 saturate anyway; keep the pow in range.
    let exponent = attempt.saturating_sub(1).min(32);
    let scaled = base.saturating_mul(2u32.saturating_pow(exponent));
    scaled.min(cap)
}

/// Applies full jitter: a uniformly random delay in `[0, delay]`
/// inclusive.
#[must_use]
pub fn full_jitter(delay: Duration) -> Duration {
    if delay.is_zero() {
        return delay;
    }
    let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
    Duration::from_millis(rand::rng().random_range(0..=millis))
}

/// Parses a `Retry-After` header value into a `Duration`.
///
/// Supports both formats from RFC 7231:
/// - delta seconds: `"2"` → 2 seconds
/// - HTTP-date (RFC 1123): `"Wed, 21 Oct 2015 07:28:00 GMT"` → duration
///   from `now` until that time, clamped to zero when already past
///
/// Returns `None` when the header is missing, unparseable in either
/// format, or a negative delta.
#[must_use]
pub fn parse_retry_after(headers: &http::HeaderMap, now: SystemTime) -> Option<Duration> {
    let value = headers.get(http::header::RETRY_AFTER)?.to_str().ok()?;
    let trimmed = value.trim();

    if let Ok(seconds) = trimmed.parse::<i64>() {
        let seconds = u64::try_from(seconds).ok()?;
        return Some(Duration::from_secs(seconds));
    }

    let target = httpdate::parse_http_date(trimmed).ok()?;
    Some(target.duration_since(now).unwrap_or(Duration::ZERO))
}
