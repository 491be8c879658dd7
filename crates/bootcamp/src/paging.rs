//! Page request/response value types shared by list endpoints.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;

/// Normalized page selector: page numbers start at 1, sizes are clamped to `1..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagedRequest {
    page_number: usize,
    page_size: usize,
}

impl PagedRequest {
    /// Out-of-range input is coerced rather than rejected: a page number below 1 becomes 1,
    /// a size below 1 falls back to the default and a size above the cap is clamped.
    pub fn new(page_number: Option<i64>, page_size: Option<i64>) -> Self {
        let page_number = match page_number {
            Some(number) if number >= 1 => usize::try_from(number).unwrap_or(usize::MAX),
            _ => 1,
        };
        let page_size = match page_size {
            Some(size) if size < 1 => DEFAULT_PAGE_SIZE,
            Some(size) => usize::try_from(size)
                .unwrap_or(MAX_PAGE_SIZE)
                .min(MAX_PAGE_SIZE),
            None => DEFAULT_PAGE_SIZE,
        };

        Self {
            page_number,
            page_size,
        }
    }

    pub const fn page_number(&self) -> usize {
        self.page_number
    }

    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn skip(&self) -> usize {
        (self.page_number - 1).saturating_mul(self.page_size)
    }

    pub const fn take(&self) -> usize {
        self.page_size
    }
}

impl Default for PagedRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Envelope returned by paginated list endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResponse<T> {
    pub items: Vec<T>,
    pub page_number: usize,
    pub page_size: usize,
    pub total_count: usize,
    pub total_pages: usize,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl<T> PagedResponse<T> {
    pub fn new(items: Vec<T>, total_count: usize, request: PagedRequest) -> Self {
        let total_pages = total_count.div_ceil(request.page_size());
        let page_number = request.page_number();

        Self {
            items,
            page_number,
            page_size: request.page_size(),
            total_count,
            total_pages,
            has_previous_page: page_number > 1,
            has_next_page: page_number < total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedResponse<U> {
        PagedResponse {
            items: self.items.into_iter().map(f).collect(),
            page_number: self.page_number,
            page_size: self.page_size,
            total_count: self.total_count,
            total_pages: self.total_pages,
            has_previous_page: self.has_previous_page,
            has_next_page: self.has_next_page,
        }
    }
}
