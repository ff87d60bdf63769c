//! Tests for backoff computation and Retry-After parsing.

use std::time::{Duration, SystemTime};

use super::{compute_backoff, full_jitter, parse_retry_after};

fn headers_with_retry_after(value: &str) -> http::HeaderMap {
    let mut headers = http::HeaderMap::new();
    headers.insert(
        http::header::RETRY_AFTER,
        http::HeaderValue::from_str(value).unwrap(),
    );
    headers
}

mod backoff {
    use super::*;

    const BASE: Duration = Duration::from_millis(250);
    const CAP: Duration = Duration::from_millis(8000);

    #[test]
    fn first_attempt_uses_base() {
        assert_eq!(compute_backoff(1, BASE, CAP), BASE);
    }

    #[test]
    fn doubles_per_attempt() {
        assert_eq!(compute_backoff(2, BASE, CAP), Duration::from_millis(500));
        assert_eq!(compute_backoff(3, BASE, CAP), Duration::from_millis(1000));
        assert_eq!(compute_backoff(4, BASE, CAP), Duration::from_millis(2000));
    }

    #[test]
    fn caps_at_max_delay() {
        assert_eq!(compute_backoff(6, BASE, CAP), CAP);
        assert_eq!(compute_backoff(60, BASE, CAP), CAP);
    }

    #[test]
    fn large_attempts_do_not_overflow() {
        let delay = compute_backoff(u32::MAX, BASE, Duration::from_secs(30));
        assert_eq!(delay, Duration::from_secs(30));
    }

    #[test]
    fn stays_within_bounds_for_all_attempts() {
        for attempt in 1..=64u32 {
            let uncapped = BASE.saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)));
            let expected_max = uncapped.max(BASE).min(CAP);
            let delay = compute_backoff(attempt, BASE, CAP);
            assert!(delay <= expected_max, "attempt {attempt}: {delay:?}");
        }
    }
}

mod jitter {
    use super::*;

    #[test]
    fn jittered_delay_is_within_range() {
        let capped = Duration::from_millis(2000);
        for _ in 0..256 {
            let jittered = full_jitter(capped);
            assert!(jittered <= capped);
        }
    }

    #[test]
    fn zero_delay_stays_zero() {
        assert_eq!(full_jitter(Duration::ZERO), Duration::ZERO);
    }
}

mod retry_after {
    use super::*;

    #[test]
    fn parses_delta_seconds() {
        let headers = headers_with_retry_after("2");
        let delay = parse_retry_after(&headers, SystemTime::now());
        assert_eq!(delay, Some(Duration::from_secs(2)));
    }

    #[test]
    fn parses_http_date_relative_to_now() {
        let now = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let future = now + Duration::from_secs(90);
        let headers = headers_with_retry_after(&httpdate::fmt_http_date(future));

        let delay = parse_retry_after(&headers, now).unwrap();
        assert_eq!(delay, Duration::from_secs(90));
    }

    #[test]
    fn past_http_date_clamps_to_zero() {
        let now = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let past = now - Duration::from_secs(90);
        let headers = headers_with_retry_after(&httpdate::fmt_http_date(past));

        let delay = parse_retry_after(&headers, now);
        assert_eq!(delay, Some(Duration::ZERO));
    }

    #[test]
    fn missing_header_returns_none() {
        let headers = http::HeaderMap::new();
        assert_eq!(parse_retry_after(&headers, SystemTime::now()), None);
    }

    #[test]
    fn garbage_value_returns_none() {
        let headers = headers_with_retry_after("soon");
        assert_eq!(parse_retry_after(&headers, SystemTime::now()), None);
    }

    #[test]
    fn negative_delta_returns_none() {
        let headers = headers_with_retry_after("-5");
        assert_eq!(parse_retry_after(&headers, SystemTime::now()), None);
    }
}
