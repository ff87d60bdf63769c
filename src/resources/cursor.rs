//! Shared page-fetching plumbing for the resource handles.

use std::marker::PhantomData;

use crate::cancel::CancelToken;
use crate::client::Client;
use crate::error::Error;
use crate::model::Resource;
use crate::normalize;
use crate::paginate::{Page, PageFetch, PageOptions};
use crate::time::Sleeper;
use crate::transport::Transport;

/// Fetches and normalizes one list page for a resource.
pub(crate) async fn fetch_list<R, T, S>(
    client: &Client<T, S>,
    pairs: &[(String, String)],
    requested_page: Option<u32>,
    cancel: &CancelToken,
) -> Result<Page<R>, Error>
where
    R: Resource,
    T: Transport,
    S: Sleeper,
{
    let body = client
        .execute(R::PATH, pairs, &http::HeaderMap::new(), cancel)
        .await?;

    let raw = normalize::collection(&body, R::COLLECTION_KEY);
    let items = raw
        .iter()
        .map(R::from_value)
        .collect::<Result<Vec<_>, _>>()?;
    let pagination = normalize::pagination(&body, requested_page, items.len());

    Ok(Page { items, pagination })
}

/// One resource listing's network side of a paginated traversal.
///
/// Holds the client, the non-paging query pairs, and the traversal's
/// cancellation token; the pagination engine drives it page by page.
pub struct Cursor<'a, T, S, R> {
    client: &'a Client<T, S>,
    base: Vec<(String, String)>,
    cancel: CancelToken,
    _resource: PhantomData<fn() -> R>,
}

impl<'a, T, S, R> Cursor<'a, T, S, R> {
    /// Builds a cursor sharing its cancellation token with the page
    /// options, so the engine's checks and the per-request retry loops
    /// observe the same trigger.
    pub(crate) fn prepare(
        client: &'a Client<T, S>,
        base: Vec<(String, String)>,
        mut options: PageOptions,
    ) -> (Self, PageOptions) {
        let token = options
            .cancel
            .get_or_insert_with(CancelToken::new)
            .clone();
        let cursor = Self {
            client,
            base,
            cancel: token,
            _resource: PhantomData,
        };
        (cursor, options)
    }
}

impl<T: Transport, S: Sleeper, R: Resource> PageFetch for Cursor<'_, T, S, R> {
    type Item = R;

    async fn fetch(&self, page: u32, limit: u32) -> Result<Page<R>, Error> {
        let mut pairs = self.base.clone();
        pairs.push(("page".to_string(), page.to_string()));
        pairs.push(("limit".to_string(), limit.to_string()));
        fetch_list::<R, T, S>(self.client, &pairs, Some(page), &self.cancel).await
    }
}

impl<T, S, R> std::fmt::Debug for Cursor<'_, T, S, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}
