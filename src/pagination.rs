//! Page-number window for paginated listings.
//!
//! At most `window` page numbers are shown. Near the start the window is
//! pinned to page 1, near the end to the last page, and in between it is
//! centred on the current page.

use serde::{Deserialize, Serialize};

/// Page numbers shown in a pager
pub const DEFAULT_WINDOW: u32 = 5;

/// Pagination envelope returned alongside list responses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub has_prev: bool,
    pub has_next: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_packages: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_bookings: Option<u64>,
}

impl Pagination {
    /// Item count, whichever listing this envelope belongs to
    pub fn total_items(&self) -> u64 {
        self.total_packages.or(self.total_bookings).unwrap_or(0)
    }
}

/// Pages to render plus the state of the prev/next controls
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageWindow {
    pub pages: Vec<u32>,
    pub current_page: u32,
    pub has_prev: bool,
    pub has_next: bool,
}

impl PageWindow {
    /// Window of at most `window` pages around `current` (1-based).
    ///
    /// `current` is clamped into `1..=total`. Zero pages yields an empty
    /// window with both controls disabled.
    pub fn compute(current: u32, total: u32, window: u32) -> Self {
        if total == 0 || window == 0 {
            return Self { pages: Vec::new(), current_page: current, has_prev: false, has_next: false };
        }

        let current = current.clamp(1, total);
        let half = window / 2;

        let first = if total <= window || current <= half + 1 {
            1
        } else if current >= total - half {
            total - window + 1
        } else {
            current - half
        };
        let last = (first + window - 1).min(total);

        Self {
            pages: (first..=last).collect(),
            current_page: current,
            has_prev: current > 1,
            has_next: current < total,
        }
    }

    /// Five-page window over `current` of `total`
    pub fn new(current: u32, total: u32) -> Self {
        Self::compute(current, total, DEFAULT_WINDOW)
    }

    /// Window for a server pagination envelope. The server's prev/next flags
    /// win over the locally derived ones.
    pub fn from_pagination(pagination: &Pagination) -> Self {
        let mut window = Self::new(pagination.current_page.max(1), pagination.total_pages);
        window.has_prev = pagination.has_prev;
        window.has_next = pagination.has_next;
        window
    }

    /// Whether there is more than one page to navigate
    pub fn is_needed(&self) -> bool {
        self.has_prev || self.has_next || self.pages.len() > 1
    }
}

/// 1-based bounds of the items shown on `page`, as in "Showing 10-18 of 40".
///
/// Returns `None` when there are no items.
pub fn visible_range(page: u32, limit: u32, total: u64) -> Option<(u64, u64)> {
    if total == 0 || limit == 0 {
        return None;
    }
    let page = u64::from(page.max(1));
    let limit = u64::from(limit);
    let first = (page - 1) * limit + 1;
    Some((first.min(total), (page * limit).min(total)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(current: u32, total: u32) -> Vec<u32> {
        PageWindow::new(current, total).pages
    }

    #[test]
    fn test_few_pages_shows_all() {
        assert_eq!(pages(1, 1), vec![1]);
        assert_eq!(pages(2, 4), vec![1, 2, 3, 4]);
        assert_eq!(pages(5, 5), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_ten_pages_boundaries() {
        assert_eq!(pages(1, 10), vec![1, 2, 3, 4, 5]);
        assert_eq!(pages(3, 10), vec![1, 2, 3, 4, 5]);
        assert_eq!(pages(4, 10), vec![2, 3, 4, 5, 6]);
        assert_eq!(pages(5, 10), vec![3, 4, 5, 6, 7]);
        assert_eq!(pages(7, 10), vec![5, 6, 7, 8, 9]);
        assert_eq!(pages(8, 10), vec![6, 7, 8, 9, 10]);
        assert_eq!(pages(10, 10), vec![6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_six_pages() {
        assert_eq!(pages(3, 6), vec![1, 2, 3, 4, 5]);
        assert_eq!(pages(4, 6), vec![2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_prev_next_flags() {
        let first = PageWindow::new(1, 3);
        assert!(!first.has_prev);
        assert!(first.has_next);

        let last = PageWindow::new(3, 3);
        assert!(last.has_prev);
        assert!(!last.has_next);

        let single = PageWindow::new(1, 1);
        assert!(!single.is_needed());
    }

    #[test]
    fn test_empty_and_out_of_range() {
        let empty = PageWindow::new(1, 0);
        assert!(empty.pages.is_empty());
        assert!(!empty.has_next);

        let clamped = PageWindow::new(40, 10);
        assert_eq!(clamped.current_page, 10);
        assert_eq!(clamped.pages, vec![6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_from_pagination_envelope() {
        let pagination: Pagination = serde_json::from_value(serde_json::json!({
            "currentPage": 2,
            "totalPages": 7,
            "hasPrev": true,
            "hasNext": true,
            "totalPackages": 58
        }))
        .unwrap();

        let window = PageWindow::from_pagination(&pagination);
        assert_eq!(window.pages, vec![1, 2, 3, 4, 5]);
        assert_eq!(pagination.total_items(), 58);
    }

    #[test]
    fn test_visible_range() {
        assert_eq!(visible_range(1, 9, 40), Some((1, 9)));
        assert_eq!(visible_range(2, 9, 40), Some((10, 18)));
        assert_eq!(visible_range(5, 9, 40), Some((37, 40)));
        assert_eq!(visible_range(1, 9, 0), None);
    }
}
