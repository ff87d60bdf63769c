//! Tests for retry policy decisions.

use std::time::{Duration, SystemTime};

use super::{DefaultRetryPolicy, Failure, NoRetry, RetryContext, RetryPolicy};
use crate::time::Clock;
use crate::transport::{HttpResponse, TransportError};

/// Clock pinned to a fixed instant for HTTP-date Retry-After tests.
struct FixedClock(SystemTime);

impl Clock for FixedClock {
    fn now(&self) -> SystemTime {
        self.0
    }
}

fn response(status: http::StatusCode) -> HttpResponse {
    HttpResponse::new(status, http::HeaderMap::new(), vec![])
}

fn response_with_retry_after(status: http::StatusCode, value: &str) -> HttpResponse {
    let mut headers = http::HeaderMap::new();
    headers.insert(
        http::header::RETRY_AFTER,
        http::HeaderValue::from_str(value).unwrap(),
    );
    HttpResponse::new(status, headers, vec![])
}

fn ctx<'a>(attempt: u32, failure: Failure<'a>) -> RetryContext<'a> {
    RetryContext { attempt, failure }
}

mod default_policy {
    use super::*;

    #[test]
    fn retries_transport_errors() {
        let policy = DefaultRetryPolicy::new();
        let err = TransportError::Timeout;

        let decision = policy.decide(&ctx(1, Failure::Transport(&err)));
        assert!(decision.is_some());
    }

    #[test]
    fn invalid_url_is_terminal() {
        let policy = DefaultRetryPolicy::new();
        let err = TransportError::InvalidUrl("bad".to_string());

        assert!(policy.decide(&ctx(1, Failure::Transport(&err))).is_none());
    }

    #[test]
    fn retries_429_and_5xx() {
        let policy = DefaultRetryPolicy::new();

        for status in [
            http::StatusCode::TOO_MANY_REQUESTS,
            http::StatusCode::INTERNAL_SERVER_ERROR,
            http::StatusCode::BAD_GATEWAY,
            http::StatusCode::SERVICE_UNAVAILABLE,
            http::StatusCode::GATEWAY_TIMEOUT,
        ] {
            let resp = response(status);
            assert!(
                policy.decide(&ctx(1, Failure::Response(&resp))).is_some(),
                "{status} should be retried"
            );
        }
    }

    #[test]
    fn other_4xx_is_terminal() {
        let policy = DefaultRetryPolicy::new();

        for status in [
            http::StatusCode::BAD_REQUEST,
            http::StatusCode::UNAUTHORIZED,
            http::StatusCode::FORBIDDEN,
            http::StatusCode::NOT_FOUND,
        ] {
            let resp = response(status);
            assert!(
                policy.decide(&ctx(1, Failure::Response(&resp))).is_none(),
                "{status} should be terminal"
            );
        }
    }

    #[test]
    fn attempts_beyond_budget_are_terminal() {
        let policy = DefaultRetryPolicy::new().with_max_retries(3);
        let err = TransportError::Timeout;

        assert!(policy.decide(&ctx(3, Failure::Transport(&err))).is_some());
        assert!(policy.decide(&ctx(4, Failure::Transport(&err))).is_none());
    }

    #[test]
    fn zero_retries_disables_retrying() {
        let policy = DefaultRetryPolicy::new().with_max_retries(0);
        let err = TransportError::Timeout;

        assert!(policy.decide(&ctx(1, Failure::Transport(&err))).is_none());
    }

    #[test]
    fn retry_after_seconds_is_taken_exactly() {
        // Jitter is bypassed: the server-provided value comes back as-is.
        let policy = DefaultRetryPolicy::new();
        let resp = response_with_retry_after(http::StatusCode::TOO_MANY_REQUESTS, "2");

        let decision = policy.decide(&ctx(1, Failure::Response(&resp))).unwrap();
        assert_eq!(decision.delay, Duration::from_millis(2000));
    }

    #[test]
    fn retry_after_http_date_uses_clock() {
        let now = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let policy = DefaultRetryPolicy::new().with_clock(FixedClock(now));
        let resp = response_with_retry_after(
            http::StatusCode::TOO_MANY_REQUESTS,
            &httpdate::fmt_http_date(now + Duration::from_secs(30)),
        );

        let decision = policy.decide(&ctx(1, Failure::Response(&resp))).unwrap();
        assert_eq!(decision.delay, Duration::from_secs(30));
    }

    #[test]
    fn unparseable_retry_after_falls_back_to_backoff() {
        let policy = DefaultRetryPolicy::new()
            .with_base_delay(Duration::from_millis(100))
            .with_max_delay(Duration::from_millis(100));
        let resp = response_with_retry_after(http::StatusCode::TOO_MANY_REQUESTS, "soon");

        let decision = policy.decide(&ctx(1, Failure::Response(&resp))).unwrap();
        assert!(decision.delay <= Duration::from_millis(100));
    }

    #[test]
    fn backoff_delay_respects_cap() {
        let policy = DefaultRetryPolicy::new()
            .with_max_retries(10)
            .with_max_delay(Duration::from_millis(500));
        let resp = response(http::StatusCode::SERVICE_UNAVAILABLE);

        for attempt in 1..=10 {
            let decision = policy
                .decide(&ctx(attempt, Failure::Response(&resp)))
                .unwrap();
            assert!(decision.delay <= Duration::from_millis(500));
        }
    }
}

mod no_retry {
    use super::*;

    #[test]
    fn never_retries_anything() {
        let err = TransportError::Timeout;
        let resp = response(http::StatusCode::SERVICE_UNAVAILABLE);

        assert!(NoRetry.decide(&ctx(1, Failure::Transport(&err))).is_none());
        assert!(NoRetry.decide(&ctx(1, Failure::Response(&resp))).is_none());
    }
}
