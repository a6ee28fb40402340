//! Fixed-size paging over filtered rows.
//!
//! The page index is never reset here when filters change; callers that
//! want to jump back to the first page call [`Pagination::first`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

/// One of the selectable page sizes: 10, 20, 30, 40 or 50.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PageSize(u32);

impl PageSize {
    pub const OPTIONS: [u32; 5] = [10, 20, 30, 40, 50];

    pub fn new(size: u32) -> Result<Self, String> {
        if Self::OPTIONS.contains(&size) {
            Ok(Self(size))
        } else {
            Err(format!(
                "Invalid page size {}. Valid options: 10, 20, 30, 40, 50",
                size
            ))
        }
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    fn rows(&self) -> usize {
        self.0 as usize
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(10)
    }
}

impl TryFrom<u32> for PageSize {
    type Error = String;

    fn try_from(size: u32) -> Result<Self, Self::Error> {
        Self::new(size)
    }
}

impl From<PageSize> for u32 {
    fn from(size: PageSize) -> Self {
        size.0
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let size: u32 = s
            .trim()
            .parse()
            .map_err(|_| format!("Invalid page size '{}'", s))?;
        Self::new(size)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Zero-based.
    pub page_index: usize,
    pub page_size: PageSize,
}

impl Pagination {
    pub fn new(page_size: PageSize) -> Self {
        Self {
            page_index: 0,
            page_size,
        }
    }

    /// `ceil(total_rows / page_size)`; zero when there are no rows.
    pub fn page_count(&self, total_rows: usize) -> usize {
        total_rows.div_ceil(self.page_size.rows())
    }

    pub fn can_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_next(&self, total_rows: usize) -> bool {
        self.page_index.saturating_add(1) < self.page_count(total_rows)
    }

    pub fn first(&mut self) {
        self.page_index = 0;
    }

    pub fn previous(&mut self) {
        self.page_index = self.page_index.saturating_sub(1);
    }

    pub fn next(&mut self, total_rows: usize) {
        if self.can_next(total_rows) {
            self.page_index += 1;
        }
    }

    pub fn last(&mut self, total_rows: usize) {
        self.page_index = self.page_count(total_rows).saturating_sub(1);
    }

    /// Changes the page size, keeping the first row of the current page
    /// on screen.
    pub fn set_page_size(&mut self, page_size: PageSize) {
        let top_row = self.page_index.saturating_mul(self.page_size.rows());
        self.page_size = page_size;
        self.page_index = top_row / page_size.rows();
    }

    /// Row indices on the current page. Empty once the index is past the end.
    pub fn range(&self, total_rows: usize) -> Range<usize> {
        let start = self
            .page_index
            .saturating_mul(self.page_size.rows())
            .min(total_rows);
        let end = start.saturating_add(self.page_size.rows()).min(total_rows);
        start..end
    }

    pub fn slice<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        &rows[self.range(rows.len())]
    }
}
