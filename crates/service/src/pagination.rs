//! Pagination utilities for service layer
//!
//! Provides a simple `Pagination` struct and helpers to normalize inputs.

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;
/// Largest page index whose one-based number is still distinct.
pub const MAX_PAGE: u64 = u64::MAX - 1;

/// Pagination parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    /// 0-based page index
    pub page: u64,
    /// items per page
    pub size: u64,
}

impl Pagination {
    /// Clamp the page size to `1..=MAX_PAGE_SIZE` and the page index to
    /// `MAX_PAGE`; returns `(page, size)`.
    pub fn normalize(self) -> (u64, u64) {
        (self.page.min(MAX_PAGE), self.size.clamp(1, MAX_PAGE_SIZE))
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 0, size: DEFAULT_PAGE_SIZE } }
}
