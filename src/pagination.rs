//! Skip/limit pagination shared by list operations.

use serde::{Deserialize, Serialize};

/// Default page size when the caller does not provide one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// A validated 1-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pagination {
    page: u32,
    limit: u32,
}

impl Pagination {
    /// Creates a page window, clamping out-of-range values.
    ///
    /// `page` is raised to at least 1 and `limit` is clamped into
    /// `1..=MAX_PAGE_SIZE`.
    #[must_use]
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Returns the 1-based page number.
    #[must_use]
    pub const fn page(self) -> u32 {
        self.page
    }

    /// Returns the page size.
    #[must_use]
    pub const fn limit(self) -> u32 {
        self.limit
    }

    /// Returns how many records precede this page.
    #[must_use]
    pub fn skip(self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }

    /// Builds the page summary for a result set of `total` records.
    #[must_use]
    pub fn info(self, total: u64) -> PageInfo {
        PageInfo {
            page: self.page,
            limit: self.limit,
            total,
            pages: total.div_ceil(u64::from(self.limit)),
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Page summary returned next to paginated items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub limit: u32,
    /// Number of records matching the filter.
    pub total: u64,
    /// Number of pages for `total` records.
    pub pages: u64,
}

impl PageInfo {
    /// Describes an unpaginated result: every record on page 1.
    #[must_use]
    pub fn single(total: u64) -> Self {
        Self {
            page: 1,
            limit: u32::try_from(total).unwrap_or(u32::MAX),
            total,
            pages: u64::from(total > 0),
        }
    }
}

/// A page of items with its summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Summary of the page window.
    pub pagination: PageInfo,
}
