//! Cooperative cancellation for in-flight operations.
//!
//! A single [`CancelToken`] is threaded through every suspension point of
//! a logical operation: the retry loop of one request, or the multi-page
//! traversal of a paginated iteration. Once the token fires, the
//! operation fails with [`Error::Cancelled`] and performs no further
//! network activity. There is no separate timeout concept; callers
//! implement timeouts by cancelling after a deadline.

use std::time::Duration;

use crate::error::Error;
use crate::time::Sleeper;

/// Cancellation token observed cooperatively at suspension points.
///
/// Trigger with [`CancelToken::cancel`], query with
/// [`CancelToken::is_cancelled`], subscribe with
/// [`CancelToken::cancelled`]. Clones share the same trigger state.
pub type CancelToken = tokio_util::sync::CancellationToken;

/// Waits up to `duration`, aborting promptly if `token` fires first.
///
/// Returns immediately when `duration` is zero. Fails with
/// [`Error::Cancelled`] without waiting when the token is already
/// triggered, and as soon as it triggers otherwise, not after the full
/// duration has elapsed.
///
/// # Errors
///
/// Returns [`Error::Cancelled`] if the token fires before the wait
/// completes.
pub async fn sleep_cancellable<S: Sleeper>(
    sleeper: &S,
    duration: Duration,
    token: &CancelToken,
) -> Result<(), Error> {
    if token.is_cancelled() {
        return Err(Error::Cancelled);
    }
    if duration.is_zero() {
        return Ok(());
    }

    tokio::select! {
        () = token.cancelled() => Err(Error::Cancelled),
        () = sleeper.sleep(duration) => Ok(()),
    }
}

#[cfg(test)]
#[path = "cancel_tests.rs"]
mod tests;
