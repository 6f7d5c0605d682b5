//! Pagination envelope shared by CrateDig collection endpoints.
//!
//! The envelope mirrors the `pagination` object the music-metadata provider
//! attaches to list responses: the current page, the page count, the total
//! number of items, the page size, and absolute links to neighbouring pages.
//! Links are only present when the neighbour exists, so the first page never
//! carries `first`/`prev` and the last page never carries `next`/`last`.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Page size used when the caller does not request one.
pub const DEFAULT_PER_PAGE: u32 = 50;
/// Largest page size a caller may request.
pub const MAX_PER_PAGE: u32 = 100;

const PAGE_PARAM: &str = "page";
const PER_PAGE_PARAM: &str = "per_page";

/// Errors raised when a page selection is out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// Pages are numbered from one.
    #[error("page must be a positive integer")]
    ZeroPage,
    /// The requested page size is zero or above [`MAX_PER_PAGE`].
    #[error("per_page must be between 1 and {max}")]
    PerPageOutOfRange {
        /// Upper bound accepted for `per_page`.
        max: u32,
    },
}

/// Validated page selection.
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::new(2, 10).expect("valid page");
/// assert_eq!(request.offset(), 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PageRequest {
    /// Validate an explicit page selection.
    ///
    /// # Errors
    /// Returns [`PageRequestError`] when `page` is zero or `per_page` falls
    /// outside `1..=MAX_PER_PAGE`.
    pub const fn new(page: u32, per_page: u32) -> Result<Self, PageRequestError> {
        if page == 0 {
            return Err(PageRequestError::ZeroPage);
        }
        if per_page == 0 || per_page > MAX_PER_PAGE {
            return Err(PageRequestError::PerPageOutOfRange { max: MAX_PER_PAGE });
        }
        Ok(Self { page, per_page })
    }

    /// Build a page selection from optional query parameters, falling back to
    /// the first page and [`DEFAULT_PER_PAGE`].
    ///
    /// # Errors
    /// Propagates [`PageRequestError`] from [`PageRequest::new`].
    pub fn from_query(page: Option<u32>, per_page: Option<u32>) -> Result<Self, PageRequestError> {
        Self::new(page.unwrap_or(1), per_page.unwrap_or(DEFAULT_PER_PAGE))
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Number of items per page.
    #[must_use]
    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Index of the first item on this page.
    #[must_use]
    pub fn offset(&self) -> usize {
        let skipped = usize::try_from(self.page.saturating_sub(1)).unwrap_or(usize::MAX);
        let size = usize::try_from(self.per_page).unwrap_or(usize::MAX);
        skipped.saturating_mul(size)
    }

    /// Borrow the items belonging to this page. Pages beyond the end yield an
    /// empty slice.
    #[must_use]
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let size = usize::try_from(self.per_page).unwrap_or(usize::MAX);
        let start = self.offset().min(items.len());
        let end = start.saturating_add(size).min(items.len());
        items.get(start..end).unwrap_or_default()
    }
}

/// Links to neighbouring pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageUrls {
    /// Link to the first page, absent on the first page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<Url>,
    /// Link to the previous page, absent on the first page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<Url>,
    /// Link to the next page, absent on the last page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<Url>,
    /// Link to the last page, absent on the last page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<Url>,
}

/// Pagination envelope attached to list responses.
///
/// # Examples
/// ```
/// use pagination::{PageRequest, Pagination};
/// use url::Url;
///
/// let base = Url::parse("https://example.test/api/v1/users/7/vinyl").expect("url");
/// let request = PageRequest::new(1, 10).expect("valid page");
/// let envelope = Pagination::for_items(request, 25, &base);
/// assert_eq!(envelope.pages(), 3);
/// assert!(envelope.urls().prev.is_none());
/// assert!(envelope.urls().next.is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    page: u32,
    pages: u32,
    items: u64,
    per_page: u32,
    urls: PageUrls,
}

impl Pagination {
    /// Describe `request` over a collection of `items` entries, deriving page
    /// links from `base`. Query parameters already present on `base` are kept.
    #[must_use]
    pub fn for_items(request: PageRequest, items: u64, base: &Url) -> Self {
        let pages = u32::try_from(items.div_ceil(u64::from(request.per_page)))
            .unwrap_or(u32::MAX)
            .max(1);
        let page = request.page;
        let link = |target: u32| page_link(base, target, request.per_page);

        let urls = PageUrls {
            first: (page > 1).then(|| link(1)),
            prev: (page > 1).then(|| link(page.saturating_sub(1).min(pages))),
            next: (page < pages).then(|| link(page.saturating_add(1))),
            last: (page < pages).then(|| link(pages)),
        };

        Self {
            page,
            pages,
            items,
            per_page: request.per_page,
            urls,
        }
    }

    /// Current one-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Total number of pages; never zero.
    #[must_use]
    pub const fn pages(&self) -> u32 {
        self.pages
    }

    /// Total number of items across all pages.
    #[must_use]
    pub const fn items(&self) -> u64 {
        self.items
    }

    /// Page size.
    #[must_use]
    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Neighbouring page links.
    #[must_use]
    pub const fn urls(&self) -> &PageUrls {
        &self.urls
    }
}

fn page_link(base: &Url, page: u32, per_page: u32) -> Url {
    let retained: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| key != PAGE_PARAM && key != PER_PAGE_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut url = base.clone();
    url.set_query(None);
    {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in &retained {
            pairs.append_pair(key, value);
        }
        pairs
            .append_pair(PAGE_PARAM, &page.to_string())
            .append_pair(PER_PAGE_PARAM, &per_page.to_string());
    }
    url
}
