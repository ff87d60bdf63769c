//! Normalized domain records returned to callers.
//!
//! Every entity is an immutable value record: each field is a concrete
//! scalar, an explicit `Option`, or a list, never a raw wire shape.
//! Construction from wire payloads lives in the normalizer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ShapeError;

/// A post author, embedded by value in posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Author {
    /// Stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Avatar or profile image URL, if any.
    pub image: Option<String>,
}

/// A content tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Tag {
    /// Stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// URL slug.
    pub slug: String,
    /// Optional tag description.
    pub description: Option<String>,
}

/// A content category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Category {
    /// Stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// URL slug.
    pub slug: String,
    /// Optional category description.
    pub description: Option<String>,
}

/// Attribution for republished content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribution {
    /// Original author name.
    pub author: String,
    /// Link to the original publication.
    pub url: String,
}

/// A published post with embedded author, category and tag copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Stable identifier.
    pub id: String,
    /// URL slug.
    pub slug: String,
    /// Post title.
    pub title: String,
    /// Rendered post body.
    pub content: String,
    /// Short summary.
    pub description: String,
    /// Cover image URL, if any.
    pub cover_image: Option<String>,
    /// Publication time. Required on the wire.
    pub published_at: DateTime<Utc>,
    /// Last update time; falls back to `published_at` when the wire
    /// omits it.
    pub updated_at: DateTime<Utc>,
    /// Embedded author copies (not references).
    pub authors: Vec<Author>,
    /// Embedded category copy, if assigned.
    pub category: Option<Category>,
    /// Embedded tag copies.
    pub tags: Vec<Tag>,
    /// Attribution sub-record for republished content.
    pub attribution: Option<Attribution>,
}

/// Pagination descriptor attached to every list response.
///
/// `next_page == None` signals the terminal page; consumers must stop
/// requesting further pages on seeing it, regardless of `total_pages`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Page size the server applied.
    pub limit: u64,
    /// 1-based index of this page.
    pub current_page: u32,
    /// Cursor to the following page, absent on the terminal page.
    pub next_page: Option<u32>,
    /// Cursor to the preceding page, absent on the first page.
    pub previous_page: Option<u32>,
    /// Total items across all pages.
    pub total_items: u64,
    /// Total page count.
    pub total_pages: u64,
}

/// Wire-level description of a listable resource collection.
///
/// Centralizes each collection's envelope keys, endpoint path and
/// default page size so all four resources share identical fallback
/// semantics in the normalizer and pagination engine.
pub trait Resource: Sized + Send {
    /// Resource-specific collection key checked before the `data`
    /// fallback (e.g. `"posts"`).
    const COLLECTION_KEY: &'static str;

    /// Singular envelope key for get-by-id responses (e.g. `"post"`).
    const SINGULAR_KEY: &'static str;

    /// Endpoint path relative to the API base URL.
    const PATH: &'static str;

    /// Page size used when the caller does not specify one.
    const DEFAULT_PAGE_SIZE: u32;

    /// Normalizes one wire item into the strict record.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError`] when a structurally required field is
    /// absent or unparseable.
    fn from_value(value: &serde_json::Value) -> Result<Self, ShapeError>;
}
