//! The posts resource: rich listing, get-by-id, and pagination.

use super::cursor::{self, Cursor};
use super::query::ListPostsQuery;
use crate::cancel::CancelToken;
use crate::client::Client;
use crate::error::Error;
use crate::model::{Post, Resource};
use crate::normalize;
use crate::paginate::{Items, Page, PageOptions, Pages};
use crate::time::{Sleeper, TokioSleeper};
use crate::transport::{ReqwestTransport, Transport};

/// One page of posts with its pagination descriptor.
pub type PostList = Page<Post>;

/// Lazy page cursor over the posts collection.
pub type PostPages<'a, T = ReqwestTransport, S = TokioSleeper> = Pages<Cursor<'a, T, S, Post>>;

/// Lazy item cursor over the posts collection.
pub type PostItems<'a, T = ReqwestTransport, S = TokioSleeper> = Items<Cursor<'a, T, S, Post>>;

/// Handle over the posts resource.
///
/// Obtained from [`Client::posts`]; a copyable view that owns no state.
pub struct Posts<'a, T, S> {
    client: &'a Client<T, S>,
}

impl<'a, T, S> Posts<'a, T, S> {
    pub(crate) const fn new(client: &'a Client<T, S>) -> Self {
        Self { client }
    }
}

impl<T, S> Clone for Posts<'_, T, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, S> Copy for Posts<'_, T, S> {}

impl<'a, T: Transport, S: Sleeper> Posts<'a, T, S> {
    /// Lists one page of posts.
    ///
    /// # Errors
    ///
    /// See [`Client::execute`]; additionally [`Error::InvalidShape`]
    /// when a post fails to normalize.
    pub async fn list(&self, query: &ListPostsQuery) -> Result<PostList, Error> {
        self.list_with(query, &CancelToken::new()).await
    }

    /// Lists one page of posts, observing the given cancellation token.
    ///
    /// # Errors
    ///
    /// See [`Posts::list`]; fails with [`Error::Cancelled`] when the
    /// token fires.
    pub async fn list_with(
        &self,
        query: &ListPostsQuery,
        cancel: &CancelToken,
    ) -> Result<PostList, Error> {
        cursor::fetch_list::<Post, T, S>(self.client, &query.to_pairs(), query.page, cancel).await
    }

    /// Fetches a single post by id or slug.
    ///
    /// # Errors
    ///
    /// See [`Client::execute`]; a missing post surfaces as
    /// [`Error::Http`] with status 404.
    pub async fn get(&self, id_or_slug: &str) -> Result<Post, Error> {
        self.get_with(id_or_slug, &CancelToken::new()).await
    }

    /// Fetches a single post by id or slug, observing the given token.
    ///
    /// # Errors
    ///
    /// See [`Posts::get`]; fails with [`Error::Cancelled`] when the
    /// token fires.
    pub async fn get_with(&self, id_or_slug: &str, cancel: &CancelToken) -> Result<Post, Error> {
        let path = format!("{}/{id_or_slug}", Post::PATH);
        let body = self
            .client
            .execute(&path, &[], &http::HeaderMap::new(), cancel)
            .await?;
        let value = normalize::single(&body, Post::SINGULAR_KEY);
        Ok(Post::from_value(value)?)
    }

    /// Returns a lazy cursor over whole pages of posts matching `query`.
    ///
    /// Paging parameters come from `options`; any `limit`/`page` set on
    /// the query itself are ignored in favor of the cursor's own state.
    #[must_use]
    pub fn pages(&self, query: &ListPostsQuery, options: PageOptions) -> PostPages<'a, T, S> {
        let (cursor, options) = Cursor::prepare(self.client, query.filter_pairs(), options);
        Pages::new(cursor, Post::DEFAULT_PAGE_SIZE, options)
    }

    /// Returns a lazy cursor over individual posts, flattening pages.
    #[must_use]
    pub fn items(&self, query: &ListPostsQuery, options: PageOptions) -> PostItems<'a, T, S> {
        Items::new(self.pages(query, options))
    }
}

impl<T, S> std::fmt::Debug for Posts<'_, T, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Posts").finish_non_exhaustive()
    }
}
