//! The webhook event envelope.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A verified webhook delivery's event envelope.
///
/// `data` is left as raw JSON; its shape varies per event kind and
/// callers pick it apart with the normalized entity types where it
/// matches one.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WebhookEvent {
    /// Delivery identifier.
    pub id: String,
    /// Event kind, e.g. `post.published` (wire key `type`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Event creation time, when the wire carries one.
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Event-specific payload.
    #[serde(default)]
    pub data: serde_json::Value,
}
