use serde::{Deserialize, Serialize};

use crate::person::Person;

/// Page numbers in `Metadata` are one-based; the first page is always 1.
pub const FIRST_PAGE: u64 = 1;

/// Pagination descriptor.
///
/// Callers always request pages by zero-based index; `calculate` is the
/// single place that converts to the one-based numbers presented here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub current_page: u64,
    pub page_size: u64,
    pub first_page: u64,
    pub last_page: u64,
    pub total_records: u64,
}

impl Metadata {
    /// `page` is the zero-based index that was requested. `current_page` is
    /// `page + 1`, saturating: indexes `u64::MAX - 1` and `u64::MAX` both
    /// report `u64::MAX`.
    ///
    /// `last_page` is `ceil(total_records / page_size)`, except that an empty
    /// result set (or a zero page size) still reports a last page of 1.
    pub fn calculate(total_records: u64, page: u64, page_size: u64) -> Self {
        let last_page = if total_records == 0 || page_size == 0 {
            FIRST_PAGE
        } else {
            total_records.div_ceil(page_size)
        };
        Self {
            current_page: page.saturating_add(1),
            page_size,
            first_page: FIRST_PAGE,
            last_page,
            total_records,
        }
    }
}

/// One page of a person listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonPage {
    pub meta: Metadata,
    pub persons: Vec<Person>,
}
