/// Batch pagination over the gallery set
///
/// The cursor only moves forward. The "load more" affordance is inserted
/// the first time a batch leaves images behind, and is disabled for good
/// once a load triggered from it reaches the end of the set.

use std::ops::Range;

/// State of the "load more" affordance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMore {
    /// Not inserted yet
    Hidden,
    /// Inserted and clickable
    Active,
    /// Inserted, disabled, showing the "no more images" label
    Exhausted,
}

#[derive(Debug, Clone)]
pub struct Pagination {
    cursor: usize,
    total: usize,
    per_page: usize,
    load_more: LoadMore,
}

impl Pagination {
    pub fn new(total: usize, per_page: usize) -> Self {
        Self {
            cursor: 0,
            total,
            per_page: per_page.max(1),
            load_more: LoadMore::Hidden,
        }
    }

    /// Number of images rendered so far (never exceeds the set length)
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn load_more(&self) -> LoadMore {
        self.load_more
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.total
    }

    /// Advance by one batch and return the indices to render
    pub fn load_next_batch(&mut self) -> Range<usize> {
        let start = self.cursor;
        self.cursor = (self.cursor + self.per_page).min(self.total);

        if self.cursor < self.total && self.load_more == LoadMore::Hidden {
            self.load_more = LoadMore::Active;
        }

        start..self.cursor
    }

    /// Handle a click on the affordance.
    ///
    /// Returns the batch to render, or `None` when the affordance is not active.
    pub fn load_more_clicked(&mut self) -> Option<Range<usize>> {
        if self.load_more != LoadMore::Active {
            return None;
        }

        let batch = self.load_next_batch();
        if self.is_exhausted() {
            self.load_more = LoadMore::Exhausted;
        }
        Some(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Initial load plus clicks until exhausted; returns the number of batch loads
    fn loads_to_exhaust(total: usize) -> usize {
        let mut pagination = Pagination::new(total, 30);
        pagination.load_next_batch();
        let mut loads = 1;
        while pagination.load_more_clicked().is_some() {
            loads += 1;
        }
        loads
    }

    #[test]
    fn test_loads_needed_is_ceil() {
        for (total, expected) in [(1, 1), (30, 1), (31, 2), (60, 2), (61, 3), (95, 4)] {
            assert_eq!(loads_to_exhaust(total), expected, "total = {}", total);
        }
    }

    #[test]
    fn test_single_page_never_inserts_affordance() {
        let mut pagination = Pagination::new(12, 30);
        assert_eq!(pagination.load_next_batch(), 0..12);
        assert_eq!(pagination.load_more(), LoadMore::Hidden);
        assert_eq!(pagination.load_more_clicked(), None);
    }

    #[test]
    fn test_exhausted_exactly_when_cursor_reaches_total() {
        let mut pagination = Pagination::new(75, 30);
        assert_eq!(pagination.load_next_batch(), 0..30);
        assert_eq!(pagination.load_more(), LoadMore::Active);

        assert_eq!(pagination.load_more_clicked(), Some(30..60));
        assert_eq!(pagination.load_more(), LoadMore::Active);

        assert_eq!(pagination.load_more_clicked(), Some(60..75));
        assert_eq!(pagination.load_more(), LoadMore::Exhausted);
        assert_eq!(pagination.cursor(), 75);

        // One-way: further clicks do nothing
        assert_eq!(pagination.load_more_clicked(), None);
        assert_eq!(pagination.load_more(), LoadMore::Exhausted);
    }

    #[test]
    fn test_affordance_inserted_once() {
        let mut pagination = Pagination::new(100, 30);
        pagination.load_next_batch();
        pagination.load_next_batch();
        assert_eq!(pagination.load_more(), LoadMore::Active);
        assert_eq!(pagination.cursor(), 60);
    }

    #[test]
    fn test_empty_set() {
        let mut pagination = Pagination::new(0, 30);
        assert_eq!(pagination.load_next_batch(), 0..0);
        assert!(pagination.is_exhausted());
        assert_eq!(pagination.load_more(), LoadMore::Hidden);
    }
}
