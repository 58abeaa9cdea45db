//! Pagination utilities for the composer list
//!
//! The store returns the full matching set; the page window is applied
//! afterwards. That loads every match into memory, which is only acceptable
//! while the catalog stays small.

/// Default number of records skipped
pub const DEFAULT_OFFSET: usize = 0;

/// Default maximum number of records returned
pub const DEFAULT_LIMIT: usize = 10;

/// Offset/limit window over an ordered result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// Records to skip from the start
    pub offset: usize,
    /// Maximum records to return (0 returns nothing)
    pub limit: usize,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            offset: DEFAULT_OFFSET,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Page {
    /// Keep only the records inside this window, preserving order
    ///
    /// # Examples
    /// ```
    /// use catalog_api::pagination::Page;
    ///
    /// let page = Page { offset: 2, limit: 3 };
    /// assert_eq!(page.apply((0..10).collect()), vec![2, 3, 4]);
    ///
    /// // Windows past the end are empty, never an error
    /// let page = Page { offset: 50, limit: 10 };
    /// assert!(page.apply((0..10).collect::<Vec<i32>>()).is_empty());
    /// ```
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        items.into_iter().skip(self.offset).take(self.limit).collect()
    }
}
