//! Pagination engine: explicit, cancellable page and item cursors.
//!
//! Paginated traversal is an explicit cursor object rather than a
//! generator: [`Pages`] exposes "has more" and "fetch next" directly, so
//! cancellation checks and the page-count cap are visible steps of the
//! cursor's own state. [`Items`] flattens pages into individual records
//! and is built purely on [`Pages`]; it performs no network activity of
//! its own.
//!
//! Cursors are forward-only and restartable per call, not resumable
//! mid-iteration: pages are requested strictly in cursor order, one at a
//! time, until exhaustion (`next_page == None`), the cap, or
//! cancellation.

use std::collections::VecDeque;

use crate::cancel::CancelToken;
use crate::error::Error;
use crate::model::Pagination;

/// One fetched page: normalized items plus the pagination descriptor.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Normalized records on this page.
    pub items: Vec<T>,
    /// Pagination descriptor; `next_page == None` marks the terminal
    /// page.
    pub pagination: Pagination,
}

/// One network round-trip of a paginated listing.
///
/// Implemented by the per-resource cursors in [`crate::resources`]; the
/// engine itself never touches the wire.
pub trait PageFetch: Send + Sync {
    /// Record type the listing yields.
    type Item;

    /// Fetches one page at the given 1-based page number and size.
    fn fetch(
        &self,
        page: u32,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Page<Self::Item>, Error>> + Send;
}

/// Options for a paginated traversal.
#[derive(Debug, Clone, Default)]
pub struct PageOptions {
    /// 1-based page to start from. Defaults to 1.
    pub start_page: Option<u32>,
    /// Page size; defaults to the resource's own default (20 for posts,
    /// 50 for the rest).
    pub page_size: Option<u32>,
    /// Cap on the number of pages fetched, regardless of cursors.
    pub max_pages: Option<u32>,
    /// Token observed before every round-trip and item yield.
    pub cancel: Option<CancelToken>,
}

impl PageOptions {
    /// Creates options with all defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the starting page (1-based).
    #[must_use]
    pub const fn with_start_page(mut self, page: u32) -> Self {
        self.start_page = Some(page);
        self
    }

    /// Sets the page size.
    #[must_use]
    pub const fn with_page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Caps the number of pages fetched.
    #[must_use]
    pub const fn with_max_pages(mut self, pages: u32) -> Self {
        self.max_pages = Some(pages);
        self
    }

    /// Attaches a cancellation token to the traversal.
    #[must_use]
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// Lazy, cancellable cursor over whole pages.
#[derive(Debug)]
pub struct Pages<F> {
    fetch: F,
    cancel: CancelToken,
    limit: u32,
    next: Option<u32>,
    fetched: u32,
    max_pages: Option<u32>,
}

impl<F: PageFetch> Pages<F> {
    pub(crate) fn new(fetch: F, default_page_size: u32, options: PageOptions) -> Self {
        Self {
            fetch,
            cancel: options.cancel.unwrap_or_default(),
            limit: options.page_size.unwrap_or(default_page_size),
            next: Some(options.start_page.unwrap_or(1)),
            fetched: 0,
            max_pages: options.max_pages,
        }
    }

    /// Returns true if another call to [`Pages::fetch_next`] may yield a
    /// page.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.next.is_some() && !self.cap_reached()
    }

    fn cap_reached(&self) -> bool {
        self.max_pages.is_some_and(|cap| self.fetched >= cap)
    }

    /// Fetches the next page in cursor order.
    ///
    /// Returns `None` once the server reported a terminal page
    /// (`next_page == None`) or the configured page cap was reached.
    /// The cancellation token is checked before the round-trip: a
    /// triggered token yields `Err(Error::Cancelled)` without any
    /// network activity. An error ends the traversal.
    pub async fn fetch_next(&mut self) -> Option<Result<Page<F::Item>, Error>> {
        if self.cap_reached() {
            self.next = None;
            return None;
        }
        let page = self.next?;

        if self.cancel.is_cancelled() {
            self.next = None;
            return Some(Err(Error::Cancelled));
        }

        match self.fetch.fetch(page, self.limit).await {
            Ok(fetched) => {
                tracing::trace!(
                    page,
                    items = fetched.items.len(),
                    next = ?fetched.pagination.next_page,
                    "fetched page"
                );
                self.fetched += 1;
                self.next = fetched.pagination.next_page;
                Some(Ok(fetched))
            }
            Err(err) => {
                self.next = None;
                Some(Err(err))
            }
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// Lazy, cancellable cursor over individual items, flattening [`Pages`].
///
/// The token is re-checked before each item is yielded: an abort can
/// happen while a caller is slowly consuming items from an
/// already-fetched page.
#[derive(Debug)]
pub struct Items<F: PageFetch> {
    pages: Pages<F>,
    buffer: VecDeque<F::Item>,
}

impl<F: PageFetch> Items<F> {
    pub(crate) fn new(pages: Pages<F>) -> Self {
        Self {
            pages,
            buffer: VecDeque::new(),
        }
    }

    /// Yields the next item, fetching further pages as needed.
    ///
    /// Returns `None` when the underlying page cursor is exhausted.
    pub async fn fetch_next(&mut self) -> Option<Result<F::Item, Error>> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                if self.pages.is_cancelled() {
                    return Some(Err(Error::Cancelled));
                }
                return Some(Ok(item));
            }

            match self.pages.fetch_next().await? {
                Ok(page) => self.buffer.extend(page.items),
                Err(err) => return Some(Err(err)),
            }
        }
    }
}

#[cfg(test)]
#[path = "paginate_tests.rs"]
mod tests;
