//! Page windows for listing queries.

use serde::Serialize;

use crate::error::ValidationError;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// A validated `(page, page_size)` window. Both are at least 1; values past
/// `u32::MAX` are clamped to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    pub fn new(page: i64, page_size: i64) -> Result<Self, ValidationError> {
        Ok(Self {
            page: at_least_one("page", page)?,
            page_size: at_least_one("page_size", page_size)?,
        })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Rows to skip: `(page - 1) * page_size`.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }
}

fn at_least_one(field: &str, value: i64) -> Result<u32, ValidationError> {
    if value < 1 {
        return Err(ValidationError::out_of_range(field, value, 1, i64::MAX));
    }
    Ok(u32::try_from(value).unwrap_or(u32::MAX))
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of results plus the totals needed to render pagination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        Self {
            items,
            page: request.page,
            page_size: request.page_size,
            total_items,
            total_pages: total_pages(total_items, request.page_size),
        }
    }
}

/// `ceil(total_items / page_size)`.
pub fn total_pages(total_items: u64, page_size: u32) -> u64 {
    total_items.div_ceil(u64::from(page_size.max(1)))
}
