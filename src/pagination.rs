//! Cursor-following pagination.
//!
//! List and search responses carry an opaque `cursor` while more pages
//! remain. The helpers here re-invoke a fetch callable with each cursor,
//! verbatim, until the server omits it. The cursor is always replaced by the
//! newest one, never reused once a newer page has arrived.

use std::future::Future;

use futures::stream::{self, Stream, TryStreamExt};

use crate::error::ApiError;

/// A single page of a paginated response.
pub trait Page {
    type Item;

    /// The items of this page, in server-returned order.
    fn items(self) -> Vec<Self::Item>;

    /// Continuation cursor; absent on the final page.
    fn cursor(&self) -> Option<&str>;
}

/// Lazily streams pages.
///
/// The first call passes `None`; each later call passes the cursor from the
/// previous page. Fetching happens only when the consumer polls for the next
/// page, and stops as soon as a page arrives without a cursor. A server that
/// keeps returning cursors keeps the stream alive; there is no page cap.
pub fn pages<P, F, Fut>(fetch: F) -> impl Stream<Item = Result<P, ApiError>>
where
    P: Page,
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<P, ApiError>>,
{
    stream::try_unfold(
        (fetch, None::<String>, false),
        |(mut fetch, cursor, exhausted)| async move {
            if exhausted {
                return Ok(None);
            }

            log::debug!("fetching page (cursor: {cursor:?})");
            let page = fetch(cursor).await?;
            let next = page.cursor().map(str::to_owned);
            let exhausted = next.is_none();

            Ok(Some((page, (fetch, next, exhausted))))
        },
    )
}

/// Lazily streams hydrated items across all pages, in page order.
pub fn items<P, F, Fut>(fetch: F) -> impl Stream<Item = Result<P::Item, ApiError>>
where
    P: Page,
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<P, ApiError>>,
{
    pages(fetch)
        .map_ok(|page| stream::iter(page.items().into_iter().map(Ok)))
        .try_flatten()
}

/// Eagerly collects every page into one ordered list.
///
/// Returns only after the final, cursor-less page has been seen.
pub async fn collect_all<P, F, Fut>(fetch: F) -> Result<Vec<P::Item>, ApiError>
where
    P: Page,
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<P, ApiError>>,
{
    items(fetch).try_collect().await
}
