//! Retry policy layer: backoff computation and retry decisions.
//!
//! The executor treats retries as a pure decision problem: each failed
//! attempt is described by a [`RetryContext`], the configured
//! [`RetryPolicy`] either returns a [`RetryDecision`] carrying a delay or
//! nothing (stop), and all I/O, including the wait itself, happens back
//! at the executor. Policies are injectable; the executor
//! hardcodes no retryable status list of its own.

mod backoff;
mod policy;

#[cfg(test)]
mod backoff_tests;
#[cfg(test)]
mod policy_tests;

pub use backoff::{compute_backoff, full_jitter, parse_retry_after};
pub use policy::{DefaultRetryPolicy, Failure, NoRetry, RetryContext, RetryDecision, RetryPolicy};
