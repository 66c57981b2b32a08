//! Normalization of raw page parameters into store windows.

/// Page used when the raw value is absent, non-numeric, or below one.
pub const DEFAULT_PAGE: u64 = 1;
/// Upper bound for the page size; larger requests fall back to the default.
pub const MAX_PAGE_SIZE: u64 = 100;
/// Page size used when the raw value is absent, non-numeric, or out of range.
pub const DEFAULT_PAGE_SIZE: u64 = MAX_PAGE_SIZE;

/// Offset and limit applied to a store query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Number of records to skip.
    pub offset: u64,
    /// Maximum number of records to return.
    pub limit: u64,
}

/// A normalized, 1-based page request.
///
/// ## Invariants
/// - `page >= 1`.
/// - `page_size <= MAX_PAGE_SIZE`. Zero is accepted and produces an empty
///   window.
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::from_raw(Some("0"), Some("250"));
/// assert_eq!(request.page(), 1);
/// assert_eq!(request.page_size(), 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    page_size: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Build a request from already-typed values, applying the same
    /// fallbacks as [`PageRequest::from_raw`].
    #[must_use]
    pub const fn new(page: u64, page_size: u64) -> Self {
        let page = if page == 0 { DEFAULT_PAGE } else { page };
        let page_size = if page_size > MAX_PAGE_SIZE {
            DEFAULT_PAGE_SIZE
        } else {
            page_size
        };
        Self { page, page_size }
    }

    /// Normalize raw query-string values.
    ///
    /// `page` falls back to 1 when absent, not an integer, or below 1.
    /// `page_size` falls back to 100 when absent, not an integer, negative,
    /// or above 100.
    #[must_use]
    pub fn from_raw(page: Option<&str>, page_size: Option<&str>) -> Self {
        Self {
            page: normalize_page(page),
            page_size: normalize_page_size(page_size),
        }
    }

    /// The 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u64 {
        self.page
    }

    /// The number of records per page.
    #[must_use]
    pub const fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Offset/limit window for this page.
    ///
    /// # Examples
    /// ```
    /// use pagination::{PageRequest, PageWindow};
    ///
    /// let window = PageRequest::new(3, 20).window();
    /// assert_eq!(window, PageWindow { offset: 40, limit: 20 });
    /// ```
    #[must_use]
    pub const fn window(&self) -> PageWindow {
        PageWindow {
            offset: self.page.saturating_sub(1).saturating_mul(self.page_size),
            limit: self.page_size,
        }
    }

    /// Last page number for a collection of `total` records.
    ///
    /// Returns zero for an empty collection or a zero page size.
    #[must_use]
    pub const fn max_page(&self, total: u64) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        total.div_ceil(self.page_size)
    }
}

fn parse_integer(raw: Option<&str>) -> Option<i64> {
    raw.map(str::trim).and_then(|value| value.parse::<i64>().ok())
}

fn normalize_page(raw: Option<&str>) -> u64 {
    parse_integer(raw)
        .and_then(|value| u64::try_from(value).ok())
        .filter(|page| *page >= 1)
        .unwrap_or(DEFAULT_PAGE)
}

fn normalize_page_size(raw: Option<&str>) -> u64 {
    parse_integer(raw)
        .and_then(|value| u64::try_from(value).ok())
        .filter(|size| *size <= MAX_PAGE_SIZE)
        .unwrap_or(DEFAULT_PAGE_SIZE)
}
