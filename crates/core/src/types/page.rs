//! Pagination request and result types.

use serde::{Deserialize, Serialize};

/// A pagination request: zero-based page index and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pageable {
    /// Zero-based page index.
    pub page: u32,
    /// Number of elements per page.
    pub size: u32,
}

impl Pageable {
    /// Default page size when the caller does not specify one.
    pub const DEFAULT_SIZE: u32 = 10;

    /// Create a pagination request.
    #[must_use]
    pub const fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }

    /// Row offset of the first element of this page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.page as u64 * self.size as u64
    }
}

impl Default for Pageable {
    fn default() -> Self {
        Self::new(0, Self::DEFAULT_SIZE)
    }
}

/// One page of an ordered result set, with totals metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Elements of the current page.
    pub items: Vec<T>,
    /// Zero-based index of this page.
    pub page: u32,
    /// Requested page size (the last page may hold fewer items).
    pub size: u32,
    /// Total number of elements across all pages.
    pub total_elements: u64,
}

impl<T> Page<T> {
    /// Wrap an already-sliced page of items with its totals.
    #[must_use]
    pub const fn new(items: Vec<T>, pageable: Pageable, total_elements: u64) -> Self {
        Self {
            items,
            page: pageable.page,
            size: pageable.size,
            total_elements,
        }
    }

    /// Slice one page out of a complete in-memory result set.
    ///
    /// The total element count is the full set's length, not the slice's.
    #[must_use]
    pub fn from_complete(all: Vec<T>, pageable: Pageable) -> Self {
        let total = all.len() as u64;
        let items: Vec<T> = all
            .into_iter()
            .skip(usize::try_from(pageable.offset()).unwrap_or(usize::MAX))
            .take(pageable.size as usize)
            .collect();
        Self::new(items, pageable, total)
    }

    /// Total number of pages for the recorded size.
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        if self.size == 0 {
            0
        } else {
            self.total_elements.div_ceil(self.size as u64)
        }
    }
}
