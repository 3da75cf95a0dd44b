use serde::Serialize;

/// Default page size for item listings
pub const DEFAULT_PER_PAGE: i64 = 10;

/// A validated page request
///
/// # Invariants
/// - `page >= 1`
/// - `per_page >= 1`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    per_page: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PageRequest {
    /// Builds a page request, defaulting missing values to page 1 of 10
    ///
    /// # Example
    /// ```
    /// use inventory_api::domain::PageRequest;
    ///
    /// let page = PageRequest::new(Some(2), Some(2)).expect("valid page");
    /// assert_eq!(page.offset(), 2);
    /// assert_eq!(page.total_pages(6), 3);
    /// ```
    pub fn new(page: Option<i64>, per_page: Option<i64>) -> Result<Self, String> {
        let defaults = Self::default();
        let page = page.unwrap_or(defaults.page);
        let per_page = per_page.unwrap_or(defaults.per_page);

        if page < 1 {
            return Err(format!("page must be at least 1, got {}", page));
        }
        if per_page < 1 {
            return Err(format!("per_page must be at least 1, got {}", per_page));
        }

        Ok(Self { page, per_page })
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn per_page(&self) -> i64 {
        self.per_page
    }

    /// Rows to skip: `(page - 1) * per_page`, saturating on absurd input
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    /// Ceiling division of `total_items` by the page size
    pub fn total_pages(&self, total_items: i64) -> i64 {
        if total_items <= 0 {
            return 0;
        }
        (total_items - 1) / self.per_page + 1
    }

    pub fn summarize(&self, total_items: i64) -> Pagination {
        Pagination {
            total_items,
            total_pages: self.total_pages(total_items),
            current_page: self.page,
            per_page: self.per_page,
        }
    }
}

/// Pagination block returned alongside a page of items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub total_items: i64,
    pub total_pages: i64,
    pub current_page: i64,
    pub per_page: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page_of_ten() {
        let page = PageRequest::new(None, None).unwrap();
        assert_eq!(page.page(), 1);
        assert_eq!(page.per_page(), 10);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn offset_skips_previous_pages() {
        let page = PageRequest::new(Some(3), Some(25)).unwrap();
        assert_eq!(page.offset(), 50);
    }

    #[test]
    fn total_pages_rounds_up() {
        let page = PageRequest::new(Some(1), Some(4)).unwrap();
        assert_eq!(page.total_pages(0), 0);
        assert_eq!(page.total_pages(1), 1);
        assert_eq!(page.total_pages(4), 1);
        assert_eq!(page.total_pages(5), 2);
        assert_eq!(page.total_pages(8), 2);
    }

    #[test]
    fn zero_or_negative_values_rejected() {
        assert!(PageRequest::new(Some(0), None).is_err());
        assert!(PageRequest::new(Some(-1), None).is_err());
        assert!(PageRequest::new(None, Some(0)).is_err());
    }

    #[test]
    fn summary_reports_requested_page() {
        let summary = PageRequest::new(Some(2), Some(2)).unwrap().summarize(6);
        assert_eq!(
            summary,
            Pagination {
                total_items: 6,
                total_pages: 3,
                current_page: 2,
                per_page: 2,
            }
        );
    }
}
