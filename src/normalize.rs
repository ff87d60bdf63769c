//! Response normalizer: loose wire payloads to strict domain records.
//!
//! Backend versions disagree on envelope shapes: collection keys,
//! `meta`-wrapped pagination, date encodings. The key-preference order
//! for every envelope type is centralized here so all four resources
//! share identical fallback semantics.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use crate::error::ShapeError;
use crate::model::{Attribution, Author, Category, Pagination, Post, Resource, Tag};

/// Generic envelope key accepted for any resource collection or single
/// record when the resource-specific key is absent.
const GENERIC_KEY: &str = "data";

/// Extracts a collection from a list envelope.
///
/// Looks for the resource-specific array key first, then the generic
/// `data` fallback; first match wins. Absence of both yields an empty
/// slice, not an error.
pub(crate) fn collection<'a>(body: &'a Value, key: &str) -> &'a [Value] {
    body.get(key)
        .and_then(Value::as_array)
        .or_else(|| body.get(GENERIC_KEY).and_then(Value::as_array))
        .map_or(&[], Vec::as_slice)
}

/// Extracts a single resource from a get-by-id envelope.
///
/// Looks for the resource-specific singular key, then `data`; when
/// neither is present the entire response object is treated as the
/// resource itself.
pub(crate) fn single<'a>(body: &'a Value, key: &str) -> &'a Value {
    body.get(key)
        .filter(|v| v.is_object())
        .or_else(|| body.get(GENERIC_KEY).filter(|v| v.is_object()))
        .unwrap_or(body)
}

/// Extracts the pagination descriptor from a list envelope.
///
/// Looks for a top-level `pagination` object, then one nested under
/// `meta`; first match wins. Absence yields a synthesized descriptor
/// using the observed item count and the caller-requested page.
pub(crate) fn pagination(
    body: &Value,
    requested_page: Option<u32>,
    observed_items: usize,
) -> Pagination {
    let observed = observed_items as u64;
    let fallback_page = requested_page.unwrap_or(1);

    let raw = body
        .get("pagination")
        .filter(|v| v.is_object())
        .or_else(|| {
            body.get("meta")
                .and_then(|meta| meta.get("pagination"))
                .filter(|v| v.is_object())
        });

    raw.map_or_else(
        || Pagination {
            limit: observed,
            current_page: fallback_page,
            next_page: None,
            previous_page: None,
            total_items: observed,
            total_pages: 1,
        },
        |p| Pagination {
            limit: u64_field(p, "limit").unwrap_or(observed),
            current_page: u32_field(p, "currentPage").unwrap_or(fallback_page),
            next_page: u32_field(p, "nextPage"),
            previous_page: u32_field(p, "previousPage"),
            total_items: u64_field(p, "totalItems").unwrap_or(observed),
            total_pages: u64_field(p, "totalPages").unwrap_or(1),
        },
    )
}

/// Coerces a wire value into an absolute timestamp.
///
/// Accepts an RFC 3339 / ISO-like string (date-only included) or a
/// numeric epoch in milliseconds. Everything else (null, objects,
/// non-finite numbers, unparseable strings) is a shape violation.
pub(crate) fn coerce_datetime(value: &Value, path: &str) -> Result<DateTime<Utc>, ShapeError> {
    match value {
        Value::String(s) => parse_datetime_str(s)
            .ok_or_else(|| ShapeError::new(path, format!("unparseable timestamp string `{s}`"))),
        Value::Number(n) => {
            let millis = n
                .as_f64()
                .filter(|f| f.is_finite())
                .ok_or_else(|| ShapeError::new(path, "non-finite numeric timestamp"))?;
            #[allow(clippy::cast_possible_truncation)]
            DateTime::from_timestamp_millis(millis as i64)
                .ok_or_else(|| ShapeError::new(path, "epoch milliseconds out of range"))
        }
        other => Err(ShapeError::new(
            path,
            format!("expected timestamp, got {}", type_name(other)),
        )),
    }
}

fn parse_datetime_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(s) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(parsed.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|n| n.and_utc())
}

const fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn str_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn opt_str_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(ToString::to_string)
}

fn u64_field(value: &Value, key: &str) -> Option<u64> {
    value.get(key).and_then(Value::as_u64)
}

fn u32_field(value: &Value, key: &str) -> Option<u32> {
    u64_field(value, key).and_then(|n| u32::try_from(n).ok())
}

fn author_from_value(value: &Value) -> Author {
    Author {
        id: str_field(value, "id"),
        name: str_field(value, "name"),
        image: opt_str_field(value, "image"),
    }
}

fn tag_from_value(value: &Value) -> Tag {
    Tag {
        id: str_field(value, "id"),
        name: str_field(value, "name"),
        slug: str_field(value, "slug"),
        description: opt_str_field(value, "description"),
    }
}

fn category_from_value(value: &Value) -> Category {
    Category {
        id: str_field(value, "id"),
        name: str_field(value, "name"),
        slug: str_field(value, "slug"),
        description: opt_str_field(value, "description"),
    }
}

fn attribution_from_value(value: &Value) -> Attribution {
    Attribution {
        author: str_field(value, "author"),
        url: str_field(value, "url"),
    }
}

impl Resource for Post {
    const COLLECTION_KEY: &'static str = "posts";
    const SINGULAR_KEY: &'static str = "post";
    const PATH: &'static str = "posts";
    const DEFAULT_PAGE_SIZE: u32 = 20;

    fn from_value(value: &Value) -> Result<Self, ShapeError> {
        let published_raw = value
            .get("publishedAt")
            .filter(|v| !v.is_null())
            .ok_or_else(|| ShapeError::new("publishedAt", "missing required field"))?;
        let published_at = coerce_datetime(published_raw, "publishedAt")?;

        let updated_at = match value.get("updatedAt").filter(|v| !v.is_null()) {
            Some(raw) => coerce_datetime(raw, "updatedAt")?,
            None => published_at,
        };

        Ok(Self {
            id: str_field(value, "id"),
            slug: str_field(value, "slug"),
            title: str_field(value, "title"),
            content: str_field(value, "content"),
            description: str_field(value, "description"),
            cover_image: opt_str_field(value, "coverImage"),
            published_at,
            updated_at,
            authors: value
                .get("authors")
                .and_then(Value::as_array)
                .map(|items| items.iter().map(author_from_value).collect())
                .unwrap_or_default(),
            category: value
                .get("category")
                .filter(|v| v.is_object())
                .map(category_from_value),
            tags: value
                .get("tags")
                .and_then(Value::as_array)
                .map(|items| items.iter().map(tag_from_value).collect())
                .unwrap_or_default(),
            attribution: value
                .get("attribution")
                .filter(|v| v.is_object())
                .map(attribution_from_value),
        })
    }
}

impl Resource for Tag {
    const COLLECTION_KEY: &'static str = "tags";
    const SINGULAR_KEY: &'static str = "tag";
    const PATH: &'static str = "tags";
    const DEFAULT_PAGE_SIZE: u32 = 50;

    fn from_value(value: &Value) -> Result<Self, ShapeError> {
        Ok(tag_from_value(value))
    }
}

impl Resource for Category {
    const COLLECTION_KEY: &'static str = "categories";
    const SINGULAR_KEY: &'static str = "category";
    const PATH: &'static str = "categories";
    const DEFAULT_PAGE_SIZE: u32 = 50;

    fn from_value(value: &Value) -> Result<Self, ShapeError> {
        Ok(category_from_value(value))
    }
}

impl Resource for Author {
    const COLLECTION_KEY: &'static str = "authors";
    const SINGULAR_KEY: &'static str = "author";
    const PATH: &'static str = "authors";
    const DEFAULT_PAGE_SIZE: u32 = 50;

    fn from_value(value: &Value) -> Result<Self, ShapeError> {
        Ok(author_from_value(value))
    }
}

#[cfg(test)]
#[path = "normalize_tests.rs"]
mod tests;
