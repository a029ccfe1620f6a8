//! Page-number pagination.
//!
//! Pages are 1-based. A page outside `1..=total_pages` yields an empty
//! slice rather than an error.

use serde::Serialize;

/// Page size of admin listings.
pub const ADMIN_PAGE_SIZE: u64 = 10;

/// Page size of public listings.
pub const PUBLIC_PAGE_SIZE: u64 = 9;

/// Page size of the admin user list.
pub const USER_PAGE_SIZE: u64 = 20;

/// `ceil(total / page_size)`; zero when there is nothing to show.
#[must_use]
pub const fn total_pages(total: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        0
    } else {
        total.div_ceil(page_size)
    }
}

/// Row offset of `page`, or `None` when the page is out of range.
#[must_use]
pub const fn page_offset(page: i64, page_size: u64, total: u64) -> Option<u64> {
    if page < 1 || page as u64 > total_pages(total, page_size) {
        return None;
    }
    Some((page as u64 - 1) * page_size)
}

/// Parse a `page` query value, defaulting to the first page.
#[must_use]
pub fn parse_page(raw: Option<&str>) -> i64 {
    raw.and_then(|p| p.trim().parse().ok()).unwrap_or(1)
}

/// Pagination summary attached to list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub total: u64,
    pub page: i64,
    pub total_pages: u64,
}

impl PageInfo {
    #[must_use]
    pub const fn new(total: u64, page: i64, page_size: u64) -> Self {
        Self {
            total,
            page,
            total_pages: total_pages(total, page_size),
        }
    }
}
