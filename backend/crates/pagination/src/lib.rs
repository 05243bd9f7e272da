//! Page-number pagination shared by list endpoints.
//!
//! A [`PageRequest`] carries the 1-indexed page the caller asked for and the
//! page size. Requests for pages that do not exist (zero, negative, or beyond
//! the last page) are valid: they resolve to an empty [`Page`] rather than an
//! error, so adapters never need a special "out of range" branch.
//!
//! [`PageEnvelope`] is the serialised shape handed to clients. It reports the
//! totals alongside navigation links that preserve the caller's query string.

use serde::Serialize;
use url::Url;

/// Largest page size a request may ask for.
pub const MAX_PER_PAGE: u32 = 100;

/// Query parameter carrying the page number in navigation links.
pub const PAGE_PARAM: &str = "page";

/// Errors raised when constructing a [`PageRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    /// The page size was zero or above [`MAX_PER_PAGE`].
    #[error("page size must be between 1 and {max}, got {per_page}")]
    InvalidPageSize {
        /// Rejected page size.
        per_page: u32,
        /// Upper bound accepted.
        max: u32,
    },
}

/// Requested page number and size.
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::new(3, 10).expect("valid size");
/// assert_eq!(request.offset(), Some(20));
/// assert_eq!(request.limit(), 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    per_page: u32,
}

impl PageRequest {
    /// Build a request for `page` (1-indexed) holding `per_page` items.
    ///
    /// # Errors
    /// Returns [`PageRequestError::InvalidPageSize`] when `per_page` is zero
    /// or larger than [`MAX_PER_PAGE`].
    pub const fn new(page: i64, per_page: u32) -> Result<Self, PageRequestError> {
        if per_page == 0 || per_page > MAX_PER_PAGE {
            return Err(PageRequestError::InvalidPageSize {
                per_page,
                max: MAX_PER_PAGE,
            });
        }
        Ok(Self { page, per_page })
    }

    /// Requested page number as supplied by the caller.
    #[must_use]
    pub const fn page(&self) -> i64 {
        self.page
    }

    /// Maximum number of items on the page.
    #[must_use]
    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Number of items to fetch.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.per_page)
    }

    /// Number of items to skip, or `None` when the page number is below 1.
    #[must_use]
    pub fn offset(&self) -> Option<u64> {
        let index = u64::try_from(self.page.checked_sub(1)?).ok()?;
        index.checked_mul(self.limit())
    }

    /// Whether this request can hold items given `total` matching rows.
    #[must_use]
    pub fn is_within(&self, total: u64) -> bool {
        u64::try_from(self.page)
            .is_ok_and(|page| page >= 1 && page <= page_count(total, self.per_page))
    }
}

fn page_count(total: u64, per_page: u32) -> u64 {
    total.div_ceil(u64::from(per_page))
}

/// One page of results plus the total number of matching items.
///
/// # Examples
/// ```
/// use pagination::{Page, PageRequest};
///
/// let request = PageRequest::new(2, 2).expect("valid size");
/// let page = Page::new(vec!["c", "d"], request, 5);
/// assert_eq!(page.pages(), 3);
/// assert_eq!(page.prev_page(), Some(1));
/// assert_eq!(page.next_page(), Some(3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    items: Vec<T>,
    request: PageRequest,
    total: u64,
}

impl<T> Page<T> {
    /// Assemble a page from already-fetched items.
    #[must_use]
    pub const fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            items,
            request,
            total,
        }
    }

    /// A page with no items, used for out-of-range requests.
    #[must_use]
    pub const fn empty(request: PageRequest, total: u64) -> Self {
        Self::new(Vec::new(), request, total)
    }

    /// Items on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the page, returning its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Requested page number.
    #[must_use]
    pub const fn page(&self) -> i64 {
        self.request.page
    }

    /// Page size used for the request.
    #[must_use]
    pub const fn per_page(&self) -> u32 {
        self.request.per_page
    }

    /// Total number of matching items across all pages.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Number of pages needed to hold every matching item.
    #[must_use]
    pub fn pages(&self) -> u64 {
        page_count(self.total, self.request.per_page)
    }

    /// Whether a page precedes this one.
    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.request.page > 1
    }

    /// Whether a page follows this one.
    #[must_use]
    pub fn has_next(&self) -> bool {
        let pages = self.pages();
        u64::try_from(self.request.page).map_or(pages > 0, |page| page < pages)
    }

    /// Previous page number, when there is one.
    #[must_use]
    pub fn prev_page(&self) -> Option<i64> {
        self.has_prev().then(|| self.request.page - 1)
    }

    /// Next page number, when there is one.
    #[must_use]
    pub fn next_page(&self) -> Option<i64> {
        if !self.has_next() {
            return None;
        }
        Some(self.request.page.max(0) + 1)
    }

    /// Transform every item while keeping the paging metadata.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            request: self.request,
            total: self.total,
        }
    }

    /// Build the client-facing envelope with links derived from `base`.
    ///
    /// `base` should carry the active filter in its query string; any
    /// existing `page` parameter is replaced. Links are origin-relative:
    /// only the path and query of `base` survive.
    #[must_use]
    pub fn into_envelope(self, base: &Url) -> PageEnvelope<T> {
        let links = PageLinks {
            current: link_for(base, self.page()),
            prev: self.prev_page().map(|page| link_for(base, page)),
            next: self.next_page().map(|page| link_for(base, page)),
        };
        PageEnvelope {
            pages: self.pages(),
            has_prev: self.has_prev(),
            has_next: self.has_next(),
            prev_page: self.prev_page(),
            next_page: self.next_page(),
            page: self.page(),
            per_page: self.per_page(),
            total: self.total,
            items: self.items,
            links,
        }
    }
}

fn link_for(base: &Url, page: i64) -> String {
    let mut url = base.clone();
    let retained: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| key != PAGE_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    url.set_query(None);
    {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in &retained {
            pairs.append_pair(key, value);
        }
        pairs.append_pair(PAGE_PARAM, &page.to_string());
    }
    match url.query() {
        Some(query) => format!("{}?{query}", url.path()),
        None => url.path().to_owned(),
    }
}

/// Navigation links for a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLinks {
    /// Link to the page itself.
    #[serde(rename = "self")]
    pub current: String,
    /// Link to the previous page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
    /// Link to the next page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

/// Serialised page returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageEnvelope<T> {
    /// Items on the page.
    pub items: Vec<T>,
    /// Requested page number.
    pub page: i64,
    /// Page size.
    pub per_page: u32,
    /// Total matching items.
    pub total: u64,
    /// Total number of pages.
    pub pages: u64,
    /// Whether a previous page exists.
    pub has_prev: bool,
    /// Whether a next page exists.
    pub has_next: bool,
    /// Previous page number.
    pub prev_page: Option<i64>,
    /// Next page number.
    pub next_page: Option<i64>,
    /// Navigation links.
    pub links: PageLinks,
}

#[cfg(test)]
mod tests;
