//! Query parameter types for list endpoints.
//!
//! Serialization rules: `None` values and empty arrays are omitted
//! entirely; `tags` is serialized as one comma-joined value under the
//! `tags` key.

/// Sort order accepted by the list-posts endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sort {
    /// Oldest published first (`publishedAt`).
    PublishedAt,
    /// Newest published first (`-publishedAt`).
    PublishedAtDesc,
    /// Least recently updated first (`updatedAt`).
    UpdatedAt,
    /// Most recently updated first (`-updatedAt`).
    UpdatedAtDesc,
}

impl Sort {
    /// Wire value for the `sort` query parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PublishedAt => "publishedAt",
            Self::PublishedAtDesc => "-publishedAt",
            Self::UpdatedAt => "updatedAt",
            Self::UpdatedAtDesc => "-updatedAt",
        }
    }
}

/// Query parameters for the list-posts endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPostsQuery {
    /// Page size.
    pub limit: Option<u32>,
    /// 1-based page number.
    pub page: Option<u32>,
    /// Full-text search term.
    pub search: Option<String>,
    /// Tag slugs; serialized comma-joined under one `tags` key.
    pub tags: Vec<String>,
    /// Category slug filter.
    pub category: Option<String>,
    /// Author slug filter.
    pub author: Option<String>,
    /// Sort order.
    pub sort: Option<Sort>,
}

impl ListPostsQuery {
    /// Creates an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size.
    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the 1-based page number.
    #[must_use]
    pub const fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Sets the search term.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Adds a tag filter.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Sets the category filter.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the author filter.
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Sets the sort order.
    #[must_use]
    pub const fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Full wire pairs, paging included.
    pub(crate) fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        pairs.extend(self.filter_pairs());
        pairs
    }

    /// Wire pairs without `limit`/`page`, for paginated traversal where
    /// the cursor owns the paging parameters.
    pub(crate) fn filter_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = &self.search {
            pairs.push(("search".to_string(), search.clone()));
        }
        if !self.tags.is_empty() {
            pairs.push(("tags".to_string(), self.tags.join(",")));
        }
        if let Some(category) = &self.category {
            pairs.push(("category".to_string(), category.clone()));
        }
        if let Some(author) = &self.author {
            pairs.push(("author".to_string(), author.clone()));
        }
        if let Some(sort) = self.sort {
            pairs.push(("sort".to_string(), sort.as_str().to_string()));
        }
        pairs
    }
}

/// Query parameters shared by the tag, category and author listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Page size.
    pub limit: Option<u32>,
    /// 1-based page number.
    pub page: Option<u32>,
}

impl ListQuery {
    /// Creates an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size.
    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the 1-based page number.
    #[must_use]
    pub const fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub(crate) fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        pairs
    }
}
