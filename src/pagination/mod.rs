//! Pagination handling for GitHub API.
//!
//! GitHub paginates list endpoints in two ways: sequential page numbers
//! (`?page=3`) and opaque server-issued cursors (`?after=Y3Vyc29yOnYy...`).
//! Both are advertised through the `Link` response header. The types here
//! carry one fetched page plus the information needed to request the next
//! one; [`PageIterator`] builds lazy iteration on top of them.

use reqwest::header::HeaderMap;
use serde::Serialize;

mod scan;

pub use scan::{must, ErrorCheck, ItemStream, MustStream, PageFetcher, PageIterator};

/// Pagination links parsed from the Link header.
#[derive(Debug, Clone, Default)]
pub struct PaginationLinks {
    /// URL for the next page.
    pub next: Option<String>,
    /// URL for the previous page.
    pub prev: Option<String>,
    /// URL for the first page.
    pub first: Option<String>,
    /// URL for the last page.
    pub last: Option<String>,
}

impl PaginationLinks {
    /// Parses pagination links from a Link header value (RFC 8288).
    pub fn from_header(header_value: &str) -> Self {
        let mut links = Self::default();

        for part in header_value.split(',') {
            let mut url = None;
            let mut rel = None;

            for segment in part.split(';') {
                let segment = segment.trim();
                if segment.starts_with('<') && segment.ends_with('>') {
                    url = Some(segment[1..segment.len() - 1].to_string());
                } else if segment.starts_with("rel=") {
                    let value = segment[4..].trim_matches('"');
                    rel = Some(value.to_string());
                }
            }

            if let (Some(url), Some(rel)) = (url, rel) {
                match rel.as_str() {
                    "next" => links.next = Some(url),
                    "prev" => links.prev = Some(url),
                    "first" => links.first = Some(url),
                    "last" => links.last = Some(url),
                    _ => {}
                }
            }
        }

        links
    }

    /// Parses pagination links from response headers.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get("link")
            .and_then(|v| v.to_str().ok())
            .map(Self::from_header)
            .unwrap_or_default()
    }

    /// Returns true if there is a next page.
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Returns true if there is a previous page.
    pub fn has_prev(&self) -> bool {
        self.prev.is_some()
    }

    /// Extracts the page number carried by the next link, if any.
    pub fn next_page_number(&self) -> Option<u32> {
        self.next
            .as_deref()
            .and_then(|url| query_param(url, "page"))
            .and_then(|v| v.parse().ok())
    }

    /// Extracts the cursor carried by the next link, if any.
    pub fn next_cursor(&self) -> Option<String> {
        self.next
            .as_deref()
            .and_then(|url| query_param(url, "after"))
            .filter(|v| !v.is_empty())
    }

    /// Gets the total page count from the last link.
    pub fn total_pages(&self) -> Option<u32> {
        self.last
            .as_deref()
            .and_then(|url| query_param(url, "page"))
            .and_then(|v| v.parse().ok())
    }
}

fn query_param(url: &str, name: &str) -> Option<String> {
    url::Url::parse(url).ok().and_then(|u| {
        u.query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    })
}

/// Which page a paginated request should fetch.
///
/// A value resolves to exactly one pagination mode: the default [`First`]
/// asks for the first page with default settings, [`Offset`] addresses a
/// page by number, and [`Cursor`] continues from a server-issued token.
///
/// [`First`]: PageRequest::First
/// [`Offset`]: PageRequest::Offset
/// [`Cursor`]: PageRequest::Cursor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageRequest {
    /// First page, default settings.
    #[default]
    First,
    /// Page addressed by a 1-indexed page number.
    Offset(u32),
    /// Page addressed by an opaque continuation cursor.
    Cursor(String),
}

impl PageRequest {
    /// Requests a specific page number.
    pub fn offset(page: u32) -> Self {
        Self::Offset(page)
    }

    /// Requests the page after an opaque cursor.
    pub fn cursor(after: impl Into<String>) -> Self {
        Self::Cursor(after.into())
    }

    /// The query parameter this request contributes, if any.
    pub fn to_query(&self) -> Option<(&'static str, String)> {
        match self {
            Self::First => None,
            Self::Offset(page) => Some(("page", page.to_string())),
            Self::Cursor(after) => Some(("after", after.clone())),
        }
    }
}

/// A single page of results.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// The items in this page.
    pub items: Vec<T>,
    /// Pagination links.
    pub links: PaginationLinks,
    /// Number of the next page; `None` (or 0) means no more pages in
    /// offset mode.
    pub next_page: Option<u32>,
    /// Cursor for the next page; `None` (or empty) means no more pages in
    /// cursor mode.
    pub after: Option<String>,
    /// Total count, when the endpoint reports one.
    pub total_count: Option<u64>,
}

impl<T> Page<T> {
    /// Creates a page, deriving continuation state from the links.
    pub fn new(items: Vec<T>, links: PaginationLinks) -> Self {
        let next_page = links.next_page_number();
        let after = links.next_cursor();
        Self {
            items,
            links,
            next_page,
            after,
            total_count: None,
        }
    }

    /// Creates an empty terminal page.
    pub fn empty() -> Self {
        Self::new(Vec::new(), PaginationLinks::default())
    }

    /// Sets the next page number.
    pub fn with_next_page(mut self, page: u32) -> Self {
        self.next_page = Some(page);
        self
    }

    /// Sets the next cursor.
    pub fn with_after(mut self, after: impl Into<String>) -> Self {
        self.after = Some(after.into());
        self
    }

    /// Sets the total count.
    pub fn with_total_count(mut self, count: u64) -> Self {
        self.total_count = Some(count);
        self
    }

    /// The request that fetches the page after this one.
    ///
    /// A non-zero `next_page` selects offset mode; otherwise a non-empty
    /// `after` selects cursor mode; otherwise pagination is exhausted and
    /// `None` is returned. Re-evaluated per page, so the mode follows
    /// whatever the endpoint advertises.
    pub fn next_request(&self) -> Option<PageRequest> {
        if let Some(page) = self.next_page.filter(|&p| p != 0) {
            return Some(PageRequest::Offset(page));
        }
        self.after
            .as_deref()
            .filter(|after| !after.is_empty())
            .map(PageRequest::cursor)
    }

    /// Returns true if there is a next page.
    pub fn has_next(&self) -> bool {
        self.next_request().is_some()
    }

    /// Returns the number of items in this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the page is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consumes the page and returns the items.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Maps the items in this page.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            links: self.links,
            next_page: self.next_page,
            after: self.after,
            total_count: self.total_count,
        }
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Page-size option shared by list requests.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListOptions {
    /// Items per page (max 100).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

impl ListOptions {
    /// Creates empty list options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets items per page.
    pub fn per_page(mut self, per_page: u32) -> Self {
        // GitHub API limits to 100
        self.per_page = Some(per_page.min(100));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_link_header() {
        let header = r#"<https://api.github.com/repos?page=2>; rel="next", <https://api.github.com/repos?page=5>; rel="last""#;
        let links = PaginationLinks::from_header(header);

        assert_eq!(links.next, Some("https://api.github.com/repos?page=2".to_string()));
        assert_eq!(links.last, Some("https://api.github.com/repos?page=5".to_string()));
        assert!(links.prev.is_none());
        assert!(links.first.is_none());
        assert_eq!(links.next_page_number(), Some(2));
        assert_eq!(links.total_pages(), Some(5));
    }

    #[test]
    fn test_parse_cursor_link_header() {
        let header = r#"<https://api.github.com/orgs/o/secret-scanning/alerts?after=c2Vjb25k>; rel="next""#;
        let links = PaginationLinks::from_header(header);

        assert_eq!(links.next_cursor(), Some("c2Vjb25k".to_string()));
        assert_eq!(links.next_page_number(), None);
    }

    #[test]
    fn test_page_from_offset_links() {
        let links = PaginationLinks::from_header(
            r#"<https://api.github.com/repos?page=3>; rel="next""#,
        );
        let page = Page::new(vec![1, 2], links);

        assert_eq!(page.next_request(), Some(PageRequest::Offset(3)));
        assert!(page.has_next());
    }

    #[test]
    fn test_page_from_cursor_links() {
        let links = PaginationLinks::from_header(
            r#"<https://api.github.com/alerts?after=tok>; rel="next""#,
        );
        let page = Page::new(vec![1], links);

        assert_eq!(page.next_request(), Some(PageRequest::cursor("tok")));
    }

    #[test]
    fn test_terminal_page() {
        let page: Page<i32> = Page::empty();
        assert!(page.next_request().is_none());
        assert!(!page.has_next());
        assert!(page.is_empty());
    }

    #[test]
    fn test_zero_next_page_means_exhausted() {
        let page = Page::new(vec![1], PaginationLinks::default()).with_next_page(0);
        assert!(page.next_request().is_none());
    }

    #[test]
    fn test_empty_cursor_means_exhausted() {
        let page = Page::new(vec![1], PaginationLinks::default()).with_after("");
        assert!(page.next_request().is_none());
    }

    #[test]
    fn test_offset_wins_over_cursor() {
        let page = Page::new(vec![1], PaginationLinks::default())
            .with_next_page(2)
            .with_after("tok");
        assert_eq!(page.next_request(), Some(PageRequest::Offset(2)));
    }

    #[test]
    fn test_page_request_query() {
        assert_eq!(PageRequest::First.to_query(), None);
        assert_eq!(
            PageRequest::offset(4).to_query(),
            Some(("page", "4".to_string()))
        );
        assert_eq!(
            PageRequest::cursor("abc").to_query(),
            Some(("after", "abc".to_string()))
        );
    }

    #[test]
    fn test_page_operations() {
        let page: Page<i32> = Page::new(vec![1, 2, 3], PaginationLinks::default())
            .with_total_count(100);

        assert_eq!(page.len(), 3);
        assert!(!page.is_empty());
        assert_eq!(page.total_count, Some(100));
        assert_eq!(page.map(|n| n * 2).into_items(), vec![2, 4, 6]);
    }

    #[test]
    fn test_list_options_per_page_limit() {
        let options = ListOptions::new().per_page(200);
        assert_eq!(options.per_page, Some(100));
    }
}
