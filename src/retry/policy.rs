//! Retry decisions: context, decision, and policy implementations.

use std::time::Duration;

use super::{compute_backoff, full_jitter, parse_retry_after};
use crate::time::{Clock, SystemClock};
use crate::transport::{HttpResponse, TransportError};

/// What went wrong on one attempt.
///
/// Exactly one of the two cases exists per failed attempt: either the
/// transport never produced a response, or a response arrived with a
/// non-success status.
#[derive(Debug)]
pub enum Failure<'a> {
    /// The transport failed before any response was received.
    Transport(&'a TransportError),
    /// A response was received with a non-2xx status.
    Response(&'a HttpResponse),
}

/// Immutable description of a failed attempt, handed to the policy.
#[derive(Debug)]
pub struct RetryContext<'a> {
    /// 1-based attempt number (1 = the initial attempt).
    pub attempt: u32,
    /// The failure that ended this attempt.
    pub failure: Failure<'a>,
}

/// A policy's instruction to try again after waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryDecision {
    /// How long to wait before the next attempt.
    pub delay: Duration,
}

/// Pure decision function consulted after every failed attempt.
///
/// Returning `None` stops the retry loop: the executor surfaces the
/// terminal error. The policy owns the retry budget; the executor
/// hardcodes no maximum of its own, so a caller-supplied policy fully
/// controls retry behavior.
pub trait RetryPolicy: Send + Sync {
    /// Decides whether to retry the failed attempt described by `ctx`.
    fn decide(&self, ctx: &RetryContext<'_>) -> Option<RetryDecision>;
}

/// Policy that never retries: the first failure is terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRetry;

impl RetryPolicy for NoRetry {
    fn decide(&self, _ctx: &RetryContext<'_>) -> Option<RetryDecision> {
        None
    }
}

/// Default retry policy.
///
/// Retries transport errors (except invalid URLs, which are
/// configuration problems), HTTP 429 (honoring a `Retry-After` header
/// exactly, bypassing jitter) and any 5xx. All other statuses are
/// terminal. Delays follow exponential backoff with full jitter:
/// uniformly random in `[0, min(base * 2^(attempt-1), cap)]`.
///
/// # Defaults
///
/// - `max_retries`: 3 (up to 4 attempts total)
/// - `base_delay`: 250 milliseconds
/// - `max_delay`: 8 seconds
///
/// # Example
///
/// ```
/// use marble_client::retry::DefaultRetryPolicy;
/// use std::time::Duration;
///
/// let policy = DefaultRetryPolicy::new()
///     .with_max_retries(5)
///     .with_base_delay(Duration::from_millis(100));
/// ```
#[derive(Debug, Clone)]
pub struct DefaultRetryPolicy<C = SystemClock> {
    max_retries: u32,
    base_delay: Duration,
    max_delay: Duration,
    clock: C,
}

impl DefaultRetryPolicy<SystemClock> {
    /// Default number of retries after the initial attempt.
    pub const DEFAULT_MAX_RETRIES: u32 = 3;

    /// Default backoff base (250 milliseconds).
    pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(250);

    /// Default backoff cap (8 seconds).
    pub const DEFAULT_MAX_DELAY: Duration = Duration::from_millis(8000);

    /// Creates the default policy.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_retries: Self::DEFAULT_MAX_RETRIES,
            base_delay: Self::DEFAULT_BASE_DELAY,
            max_delay: Self::DEFAULT_MAX_DELAY,
            clock: SystemClock,
        }
    }
}

impl Default for DefaultRetryPolicy<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> DefaultRetryPolicy<C> {
    /// Sets the maximum number of retries after the initial attempt.
    ///
    /// Zero disables retries entirely.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the backoff base delay.
    #[must_use]
    pub const fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Sets the backoff delay cap.
    #[must_use]
    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Replaces the clock used to evaluate HTTP-date `Retry-After`
    /// values. Primarily useful for tests.
    #[must_use]
    pub fn with_clock<C2>(self, clock: C2) -> DefaultRetryPolicy<C2> {
        DefaultRetryPolicy {
            max_retries: self.max_retries,
            base_delay: self.base_delay,
            max_delay: self.max_delay,
            clock,
        }
    }

    /// Returns the configured retry budget.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    fn backoff(&self, attempt: u32) -> RetryDecision {
        RetryDecision {
            delay: full_jitter(compute_backoff(attempt, self.base_delay, self.max_delay)),
        }
    }
}

impl<C: Clock> RetryPolicy for DefaultRetryPolicy<C> {
    fn decide(&self, ctx: &RetryContext<'_>) -> Option<RetryDecision> {
        if ctx.attempt > self.max_retries {
            return None;
        }

        match &ctx.failure {
            Failure::Transport(TransportError::InvalidUrl(_)) => None,
            Failure::Transport(_) => Some(self.backoff(ctx.attempt)),
            Failure::Response(response) => {
                if response.status == http::StatusCode::TOO_MANY_REQUESTS {
                    // Server-provided delay wins over computed backoff,
                    // taken exactly, without jitter.
                    let decision = parse_retry_after(&response.headers, self.clock.now())
                        .map_or_else(|| self.backoff(ctx.attempt), |delay| RetryDecision { delay });
                    Some(decision)
                } else if response.status.is_server_error() {
                    Some(self.backoff(ctx.attempt))
                } else {
                    None
                }
            }
        }
    }
}
