//! Async client for the Marble headless CMS HTTP API.
//!
//! Read-only access to posts, tags, categories and authors with
//! policy-driven retries, cancellable pagination, and inbound webhook
//! signature verification.

pub mod cancel;
pub mod client;
pub mod error;
pub mod model;
pub mod paginate;
pub mod resources;
pub mod retry;
pub mod time;
pub mod transport;
pub mod webhook;

mod normalize;
