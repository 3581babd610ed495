//! Lazy iteration across all pages of a paginated endpoint.
//!
//! [`PageIterator`] drives a page-fetch function one page at a time and can
//! be consumed three ways:
//!
//! - [`into_stream`](PageIterator::into_stream): a stream of
//!   `GitHubResult<T>` spanning every page, for callers that want to handle
//!   a fetch error in-line;
//! - [`into_items`](PageIterator::into_items): a stream of bare items plus
//!   an [`ErrorCheck`] consulted once after the stream ends;
//! - [`collect_all`](PageIterator::collect_all): everything in one `Vec`,
//!   or the error.
//!
//! All three are pull-driven: no page is fetched until the consumer asks
//! for an item beyond the current page, and dropping the stream stops
//! fetching immediately.

use crate::errors::{GitHubError, GitHubResult};
use crate::pagination::{Page, PageRequest};
use futures::future::BoxFuture;
use futures::stream::{self, BoxStream, Stream, StreamExt, TryStreamExt};
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{ready, Context, Poll};

/// Boxed page-fetch function driven by a [`PageIterator`].
///
/// The first call receives [`PageRequest::First`]; every later call receives
/// the request derived from the previous page's continuation state.
pub type PageFetcher<'a, T> =
    Box<dyn FnMut(PageRequest) -> BoxFuture<'a, GitHubResult<Page<T>>> + Send + 'a>;

/// Pull iterator over the pages of a paginated endpoint.
///
/// Tracks the request for the next page and switches between offset and
/// cursor mode per page, following whatever continuation state each
/// response advertises. A fetch error ends iteration; no further pages are
/// attempted.
pub struct PageIterator<'a, T> {
    /// Function to fetch a page.
    fetch_fn: PageFetcher<'a, T>,
    /// Request for the next fetch; `None` once exhausted.
    request: Option<PageRequest>,
}

impl<'a, T> PageIterator<'a, T> {
    /// Creates a page iterator starting at the first page.
    pub fn new<F>(fetch_fn: F) -> Self
    where
        F: FnMut(PageRequest) -> BoxFuture<'a, GitHubResult<Page<T>>> + Send + 'a,
    {
        Self::starting_at(fetch_fn, PageRequest::First)
    }

    /// Creates a page iterator starting at a specific page.
    pub fn starting_at<F>(fetch_fn: F, request: PageRequest) -> Self
    where
        F: FnMut(PageRequest) -> BoxFuture<'a, GitHubResult<Page<T>>> + Send + 'a,
    {
        Self {
            fetch_fn: Box::new(fetch_fn),
            request: Some(request),
        }
    }

    /// Returns true if there are more pages.
    pub fn has_more(&self) -> bool {
        self.request.is_some()
    }

    /// Fetches the next page, or `Ok(None)` once exhausted.
    ///
    /// An `Err` marks the iterator exhausted; later calls return `Ok(None)`.
    pub async fn next_page(&mut self) -> GitHubResult<Option<Page<T>>> {
        let Some(request) = self.request.take() else {
            return Ok(None);
        };

        let page = (self.fetch_fn)(request).await?;
        self.request = page.next_request();
        Ok(Some(page))
    }

    /// Streams every item of every page, ending after the first error.
    ///
    /// Items from a failed page are discarded: the stream yields exactly one
    /// `Err` in their place and then terminates.
    pub fn into_stream(self) -> BoxStream<'a, GitHubResult<T>>
    where
        T: Send + 'a,
    {
        stream::try_unfold(self, |mut pages| async move {
            match pages.next_page().await? {
                Some(page) => {
                    let items =
                        stream::iter(page.into_items().into_iter().map(Ok::<T, GitHubError>));
                    Ok(Some((items, pages)))
                }
                None => Ok(None),
            }
        })
        .try_flatten()
        .boxed()
    }

    /// Streams bare items, deferring the error to an [`ErrorCheck`].
    ///
    /// The stream ends on the first fetch error without surfacing it;
    /// consult the check once the stream has been drained or dropped.
    pub fn into_items(self) -> (ItemStream<'a, T>, ErrorCheck)
    where
        T: Send + 'a,
    {
        let state = Arc::new(Mutex::new(ScanState::default()));
        let items = ItemStream {
            inner: self.into_stream(),
            state: state.clone(),
            done: false,
        };
        (items, ErrorCheck { state })
    }

    /// Collects every item of every page, or returns the first fetch error.
    ///
    /// On error nothing is returned from the pages that did succeed; callers
    /// never see a partial collection.
    pub async fn collect_all(self) -> GitHubResult<Vec<T>>
    where
        T: Send + 'a,
    {
        let (items, check) = self.into_items();
        let collected: Vec<T> = items.collect().await;
        check.check()?;
        Ok(collected)
    }
}

#[derive(Debug, Default)]
struct ScanState {
    error: Option<GitHubError>,
    exhausted: bool,
}

fn lock_state(state: &Mutex<ScanState>) -> MutexGuard<'_, ScanState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Item-only stream produced by [`PageIterator::into_items`].
///
/// Ends silently on the first fetch error; the paired [`ErrorCheck`] reports
/// it afterwards. Dropping the stream early also finalizes the check.
pub struct ItemStream<'a, T> {
    inner: BoxStream<'a, GitHubResult<T>>,
    state: Arc<Mutex<ScanState>>,
    done: bool,
}

impl<T> ItemStream<'_, T> {
    fn finish(&mut self, error: Option<GitHubError>) {
        self.done = true;
        let mut state = lock_state(&self.state);
        if error.is_some() {
            state.error = error;
        }
        state.exhausted = true;
    }
}

impl<T> Stream for ItemStream<'_, T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        let this = self.get_mut();
        if this.done {
            return Poll::Ready(None);
        }

        match ready!(this.inner.as_mut().poll_next(cx)) {
            Some(Ok(item)) => Poll::Ready(Some(item)),
            Some(Err(error)) => {
                this.finish(Some(error));
                Poll::Ready(None)
            }
            None => {
                this.finish(None);
                Poll::Ready(None)
            }
        }
    }
}

impl<T> Drop for ItemStream<'_, T> {
    fn drop(&mut self) {
        // Early stop counts as exhaustion; the check must stay callable.
        lock_state(&self.state).exhausted = true;
    }
}

/// Deferred error slot paired with an [`ItemStream`].
pub struct ErrorCheck {
    state: Arc<Mutex<ScanState>>,
}

impl ErrorCheck {
    /// Returns the fetch error observed by the paired stream, if any.
    ///
    /// Callable only once the stream is exhausted (fully drained, ended by
    /// an error, or dropped); calling it earlier is a programming error and
    /// panics.
    pub fn check(self) -> GitHubResult<()> {
        let mut state = lock_state(&self.state);
        if !state.exhausted {
            panic!("pagination error checked before the item stream was exhausted");
        }
        match state.error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Adapts a fallible item stream into one that panics on the first error.
///
/// For call sites with no recovery path: items pass through untouched and
/// any `Err` aborts with a message wrapping the underlying error. An empty
/// input yields an empty output.
pub fn must<S, T>(stream: S) -> MustStream<S>
where
    S: Stream<Item = GitHubResult<T>> + Unpin,
{
    MustStream { inner: stream }
}

/// Stream adapter returned by [`must`].
pub struct MustStream<S> {
    inner: S,
}

impl<S, T> Stream for MustStream<S>
where
    S: Stream<Item = GitHubResult<T>> + Unpin,
{
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        let this = self.get_mut();
        match ready!(Pin::new(&mut this.inner).poll_next(cx)) {
            Some(Ok(item)) => Poll::Ready(Some(item)),
            Some(Err(error)) => panic!("pagination failed: {}", error),
            None => Poll::Ready(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::GitHubErrorKind;
    use crate::pagination::PaginationLinks;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn page(items: Vec<i32>) -> Page<i32> {
        Page::new(items, PaginationLinks::default())
    }

    fn boom() -> GitHubError {
        GitHubError::new(GitHubErrorKind::InternalError, "boom")
    }

    /// Replays a scripted sequence of fetch results, counting calls and
    /// recording the requests the iterator makes.
    fn scripted(
        pages: Vec<GitHubResult<Page<i32>>>,
    ) -> (
        PageFetcher<'static, i32>,
        Arc<AtomicUsize>,
        Arc<Mutex<Vec<PageRequest>>>,
    ) {
        let calls = Arc::new(AtomicUsize::new(0));
        let requests = Arc::new(Mutex::new(Vec::new()));
        let mut script = pages.into_iter();

        let fetch_calls = calls.clone();
        let fetch_requests = requests.clone();
        let fetch = Box::new(move |request: PageRequest| -> BoxFuture<'static, GitHubResult<Page<i32>>> {
            fetch_calls.fetch_add(1, Ordering::SeqCst);
            fetch_requests.lock().unwrap().push(request);
            let result = script.next().unwrap_or_else(|| Ok(Page::empty()));
            Box::pin(async move { result })
        });

        (fetch, calls, requests)
    }

    #[tokio::test]
    async fn stream_preserves_page_and_item_order() {
        let (fetch, calls, requests) = scripted(vec![
            Ok(page(vec![1, 2]).with_next_page(2)),
            Ok(page(vec![3, 4]).with_next_page(3)),
            Ok(page(vec![5])),
        ]);

        let items: Vec<i32> = PageIterator::new(fetch)
            .into_stream()
            .try_collect()
            .await
            .unwrap();

        assert_eq!(items, vec![1, 2, 3, 4, 5]);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(
            *requests.lock().unwrap(),
            vec![
                PageRequest::First,
                PageRequest::Offset(2),
                PageRequest::Offset(3)
            ]
        );
    }

    #[tokio::test]
    async fn stream_follows_cursor_mode() {
        let (fetch, calls, requests) = scripted(vec![
            Ok(page(vec![1]).with_after("c1")),
            Ok(page(vec![2]).with_after("c2")),
            Ok(page(vec![3])),
        ]);

        let items: Vec<i32> = PageIterator::new(fetch)
            .into_stream()
            .try_collect()
            .await
            .unwrap();

        assert_eq!(items, vec![1, 2, 3]);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(
            *requests.lock().unwrap(),
            vec![
                PageRequest::First,
                PageRequest::cursor("c1"),
                PageRequest::cursor("c2")
            ]
        );
    }

    #[tokio::test]
    async fn stream_switches_mode_per_page() {
        let (fetch, _, requests) = scripted(vec![
            Ok(page(vec![1]).with_next_page(2)),
            Ok(page(vec![2]).with_after("c9")),
            Ok(page(vec![3])),
        ]);

        let items: Vec<i32> = PageIterator::new(fetch)
            .into_stream()
            .try_collect()
            .await
            .unwrap();

        assert_eq!(items, vec![1, 2, 3]);
        assert_eq!(
            *requests.lock().unwrap(),
            vec![
                PageRequest::First,
                PageRequest::Offset(2),
                PageRequest::cursor("c9")
            ]
        );
    }

    #[tokio::test]
    async fn stream_yields_one_error_then_ends() {
        let (fetch, calls, _) = scripted(vec![
            Ok(page(vec![1, 2]).with_next_page(2)),
            Err(boom()),
        ]);

        let mut stream = PageIterator::new(fetch).into_stream();
        assert_eq!(stream.next().await.unwrap().unwrap(), 1);
        assert_eq!(stream.next().await.unwrap().unwrap(), 2);
        assert!(matches!(stream.next().await, Some(Err(_))));
        assert!(stream.next().await.is_none());

        // no fetch after the failing page
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn stream_discards_items_of_failed_page() {
        let (fetch, _, _) = scripted(vec![Err(boom())]);

        let results: Vec<GitHubResult<i32>> =
            PageIterator::new(fetch).into_stream().collect().await;

        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
    }

    #[tokio::test]
    async fn early_drop_stops_fetching() {
        let (fetch, calls, _) = scripted(vec![
            Ok(page(vec![1, 2]).with_next_page(2)),
            Ok(page(vec![3, 4])),
        ]);

        let mut stream = PageIterator::new(fetch).into_stream();
        assert_eq!(stream.next().await.unwrap().unwrap(), 1);
        drop(stream);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_page_yields_nothing_but_continues() {
        let (fetch, calls, _) = scripted(vec![
            Ok(page(vec![1, 2]).with_next_page(2)),
            Ok(page(vec![]).with_next_page(3)),
            Ok(page(vec![7])),
        ]);

        let items: Vec<i32> = PageIterator::new(fetch)
            .into_stream()
            .try_collect()
            .await
            .unwrap();

        assert_eq!(items, vec![1, 2, 7]);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn next_page_reports_exhaustion() {
        let (fetch, _, _) = scripted(vec![Ok(page(vec![1]))]);
        let mut pages = PageIterator::new(fetch);

        assert!(pages.has_more());
        let first = pages.next_page().await.unwrap().unwrap();
        assert_eq!(first.items, vec![1]);
        assert!(!pages.has_more());
        assert!(pages.next_page().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn next_page_error_marks_exhausted() {
        let (fetch, calls, _) = scripted(vec![Err(boom())]);
        let mut pages = PageIterator::new(fetch);

        assert!(pages.next_page().await.is_err());
        assert!(!pages.has_more());
        assert!(pages.next_page().await.unwrap().is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn items_and_check_after_full_drain() {
        let (fetch, _, _) = scripted(vec![
            Ok(page(vec![1]).with_next_page(2)),
            Ok(page(vec![2])),
        ]);

        let (items, check) = PageIterator::new(fetch).into_items();
        let collected: Vec<i32> = items.collect().await;

        assert_eq!(collected, vec![1, 2]);
        assert!(check.check().is_ok());
    }

    #[tokio::test]
    async fn items_hide_the_error_and_check_reports_it() {
        let (fetch, _, _) = scripted(vec![
            Ok(page(vec![1]).with_next_page(2)),
            Err(boom()),
        ]);

        let (items, check) = PageIterator::new(fetch).into_items();
        let collected: Vec<i32> = items.collect().await;

        assert_eq!(collected, vec![1]);
        let error = check.check().unwrap_err();
        assert_eq!(*error.kind(), GitHubErrorKind::InternalError);
    }

    #[tokio::test]
    #[should_panic(expected = "before the item stream was exhausted")]
    async fn check_before_exhaustion_panics() {
        let (fetch, _, _) = scripted(vec![Ok(page(vec![1]))]);

        let (_items, check) = PageIterator::new(fetch).into_items();
        let _ = check.check();
    }

    #[tokio::test]
    async fn check_after_early_drop_returns_ok() {
        let (fetch, calls, _) = scripted(vec![
            Ok(page(vec![1, 2]).with_next_page(2)),
            Ok(page(vec![3])),
        ]);

        let (mut items, check) = PageIterator::new(fetch).into_items();
        assert_eq!(items.next().await, Some(1));
        drop(items);

        assert!(check.check().is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn collect_all_returns_every_item() {
        let (fetch, _, _) = scripted(vec![
            Ok(page(vec![1, 2]).with_next_page(2)),
            Ok(page(vec![3, 4]).with_next_page(3)),
            Ok(page(vec![5])),
        ]);

        let items = PageIterator::new(fetch).collect_all().await.unwrap();
        assert_eq!(items, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn collect_all_never_returns_partial_results() {
        let (fetch, _, _) = scripted(vec![
            Ok(page(vec![1, 2]).with_next_page(2)),
            Ok(page(vec![3, 4]).with_next_page(3)),
            Err(boom()),
        ]);

        let result = PageIterator::new(fetch).collect_all().await;
        let error = result.unwrap_err();
        assert_eq!(*error.kind(), GitHubErrorKind::InternalError);
    }

    #[tokio::test]
    async fn must_passes_items_through() {
        let (fetch, _, _) = scripted(vec![
            Ok(page(vec![1]).with_next_page(2)),
            Ok(page(vec![2])),
        ]);

        let items: Vec<i32> = must(PageIterator::new(fetch).into_stream())
            .collect()
            .await;
        assert_eq!(items, vec![1, 2]);
    }

    #[tokio::test]
    async fn must_on_empty_stream_yields_nothing() {
        let empty = stream::iter(Vec::<GitHubResult<i32>>::new());
        let items: Vec<i32> = must(empty).collect().await;
        assert!(items.is_empty());
    }

    #[tokio::test]
    #[should_panic(expected = "pagination failed")]
    async fn must_panics_on_error() {
        let (fetch, _, _) = scripted(vec![
            Ok(page(vec![1, 2]).with_next_page(2)),
            Err(boom()),
        ]);

        let mut items = must(PageIterator::new(fetch).into_stream());
        assert_eq!(items.next().await, Some(1));
        assert_eq!(items.next().await, Some(2));
        // the failed page aborts instead of yielding
        let _ = items.next().await;
    }
}
