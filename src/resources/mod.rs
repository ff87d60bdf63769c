//! Typed resource wrappers over the request executor.
//!
//! Each handle is a thin, copyable view over the client: it reshapes
//! already-normalized data and owns no state of its own. Posts carry the
//! rich query surface and a get-by-id endpoint; tags, categories and
//! authors share the generic [`Collection`] handle.

mod cursor;
mod posts;
mod query;

#[cfg(test)]
mod posts_tests;

use std::marker::PhantomData;

use crate::cancel::CancelToken;
use crate::client::Client;
use crate::error::Error;
use crate::model::{Author, Category, Resource, Tag};
use crate::paginate::{Items, Page, PageOptions, Pages};
use crate::time::{Sleeper, TokioSleeper};
use crate::transport::{ReqwestTransport, Transport};

pub use cursor::Cursor;
pub use posts::{PostItems, PostList, PostPages, Posts};
pub use query::{ListPostsQuery, ListQuery, Sort};

/// Generic handle over a listable resource collection.
pub struct Collection<'a, T, S, R> {
    client: &'a Client<T, S>,
    _resource: PhantomData<fn() -> R>,
}

impl<'a, T, S, R> Collection<'a, T, S, R> {
    pub(crate) const fn new(client: &'a Client<T, S>) -> Self {
        Self {
            client,
            _resource: PhantomData,
        }
    }
}

impl<T, S, R> Clone for Collection<'_, T, S, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, S, R> Copy for Collection<'_, T, S, R> {}

impl<'a, T: Transport, S: Sleeper, R: Resource> Collection<'a, T, S, R> {
    /// Lists one page of the collection.
    ///
    /// # Errors
    ///
    /// See [`Client::execute`]; additionally [`Error::InvalidShape`]
    /// when an item fails to normalize.
    pub async fn list(&self, query: &ListQuery) -> Result<Page<R>, Error> {
        self.list_with(query, &CancelToken::new()).await
    }

    /// Lists one page, observing the given cancellation token.
    ///
    /// # Errors
    ///
    /// See [`Collection::list`]; fails with [`Error::Cancelled`] when
    /// the token fires.
    pub async fn list_with(&self, query: &ListQuery, cancel: &CancelToken) -> Result<Page<R>, Error> {
        cursor::fetch_list::<R, T, S>(self.client, &query.to_pairs(), query.page, cancel).await
    }

    /// Returns a lazy cursor over whole pages.
    #[must_use]
    pub fn pages(&self, options: PageOptions) -> Pages<Cursor<'a, T, S, R>> {
        let (cursor, options) = Cursor::prepare(self.client, Vec::new(), options);
        Pages::new(cursor, R::DEFAULT_PAGE_SIZE, options)
    }

    /// Returns a lazy cursor over individual items, flattening pages.
    #[must_use]
    pub fn items(&self, options: PageOptions) -> Items<Cursor<'a, T, S, R>> {
        Items::new(self.pages(options))
    }
}

/// Handle over the tags collection.
pub type Tags<'a, T = ReqwestTransport, S = TokioSleeper> = Collection<'a, T, S, Tag>;

/// Handle over the categories collection.
pub type Categories<'a, T = ReqwestTransport, S = TokioSleeper> = Collection<'a, T, S, Category>;

/// Handle over the authors collection.
pub type Authors<'a, T = ReqwestTransport, S = TokioSleeper> = Collection<'a, T, S, Author>;

impl<T: Transport, S: Sleeper> Client<T, S> {
    /// Returns the posts handle.
    #[must_use]
    pub const fn posts(&self) -> Posts<'_, T, S> {
        Posts::new(self)
    }

    /// Returns the tags handle.
    #[must_use]
    pub const fn tags(&self) -> Tags<'_, T, S> {
        Collection::new(self)
    }

    /// Returns the categories handle.
    #[must_use]
    pub const fn categories(&self) -> Categories<'_, T, S> {
        Collection::new(self)
    }

    /// Returns the authors handle.
    #[must_use]
    pub const fn authors(&self) -> Authors<'_, T, S> {
        Collection::new(self)
    }
}
