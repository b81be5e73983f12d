//! Page arithmetic for paginated tables.
//!
//! The free functions are pure; [`PaginationState`] wraps them in an
//! immutable value that always keeps `1 <= current_page <= max(total_pages, 1)`.

use std::fmt;

/// Number of page buttons shown before the list is condensed with ellipses.
const MAX_UNCONDENSED_PAGES: u32 = 7;

/// Index range of the current page within the whole collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Zero-based index of the first item on the page.
    pub start_index: u64,
    /// Exclusive end index; never exceeds the total item count.
    pub end_index: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PageWindow {
    /// Number of items covered by the window.
    pub fn len(&self) -> u64 {
        self.end_index - self.start_index
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One slot in the page-number bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMarker {
    Page(u32),
    Ellipsis,
}

impl fmt::Display for PageMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page(n) => write!(f, "{n}"),
            Self::Ellipsis => f.write_str("..."),
        }
    }
}

/// Returns `ceil(total_items / items_per_page)`, or `0` when either is zero.
pub fn total_pages(total_items: u64, items_per_page: u32) -> u32 {
    if items_per_page == 0 {
        return 0;
    }
    let pages = total_items.div_ceil(u64::from(items_per_page));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Computes the index window for `current_page` (1-based).
///
/// `start_index` is capped at `total_items`, so `start_index <= end_index`
/// holds even for a page past the end.
pub fn compute_window(current_page: u32, items_per_page: u32, total_items: u64) -> PageWindow {
    let page_index = u64::from(current_page.saturating_sub(1));
    let per_page = u64::from(items_per_page);
    let start_index = page_index.saturating_mul(per_page).min(total_items);
    let end_index = start_index.saturating_add(per_page).min(total_items);
    let pages = total_pages(total_items, items_per_page);

    PageWindow {
        start_index,
        end_index,
        has_next: current_page < pages,
        has_prev: pages > 0 && current_page > 1,
    }
}

/// Builds the page-number bar for `current_page` out of `total_pages`.
///
/// Up to seven pages are listed in full. Beyond that the bar shows the
/// first five pages near the start, the last five near the end, and the
/// current page with its neighbours in the middle, always keeping the
/// first and last page reachable.
pub fn visible_page_numbers(current_page: u32, total_pages: u32) -> Vec<PageMarker> {
    if total_pages <= MAX_UNCONDENSED_PAGES {
        return (1..=total_pages).map(PageMarker::Page).collect();
    }

    let mut pages = Vec::with_capacity(MAX_UNCONDENSED_PAGES as usize);

    if current_page <= 4 {
        pages.extend((1..=5).map(PageMarker::Page));
        pages.push(PageMarker::Ellipsis);
        pages.push(PageMarker::Page(total_pages));
    } else if current_page >= total_pages - 3 {
        pages.push(PageMarker::Page(1));
        pages.push(PageMarker::Ellipsis);
        pages.extend((total_pages - 4..=total_pages).map(PageMarker::Page));
    } else {
        pages.push(PageMarker::Page(1));
        pages.push(PageMarker::Ellipsis);
        pages.extend((current_page - 1..=current_page + 1).map(PageMarker::Page));
        pages.push(PageMarker::Ellipsis);
        pages.push(PageMarker::Page(total_pages));
    }

    pages
}

/// Immutable pagination position for one table.
///
/// Every transition returns a new value; the current page is re-clamped
/// whenever the page size or total changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    current_page: u32,
    page_size: u32,
    total_items: u64,
}

impl PaginationState {
    /// Creates a state on page 1 with no items. A zero `page_size` is raised to 1.
    pub fn new(page_size: u32) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
            total_items: 0,
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    pub fn total_pages(&self) -> u32 {
        total_pages(self.total_items, self.page_size)
    }

    /// Returns `true` if `page` is a real page of the current collection.
    pub fn contains(&self, page: u32) -> bool {
        page >= 1 && page <= self.total_pages()
    }

    /// Moves to `page`, clamped into `1..=max(total_pages, 1)`.
    pub fn go_to(self, page: u32) -> Self {
        let last = self.total_pages().max(1);
        Self {
            current_page: page.clamp(1, last),
            ..self
        }
    }

    /// Advances one page. No-op on the last page.
    pub fn next(self) -> Self {
        if self.window().has_next {
            let page = self.current_page + 1;
            return self.go_to(page);
        }
        self
    }

    /// Steps back one page. No-op on the first page.
    pub fn prev(self) -> Self {
        if self.current_page > 1 {
            let page = self.current_page - 1;
            return self.go_to(page);
        }
        self
    }

    /// Returns to page 1.
    pub fn reset(self) -> Self {
        Self {
            current_page: 1,
            ..self
        }
    }

    /// Replaces the total item count and re-clamps the current page.
    pub fn with_total(self, total_items: u64) -> Self {
        let page = self.current_page;
        Self {
            total_items,
            ..self
        }
        .go_to(page)
    }

    /// Changes the page size, returning to page 1.
    pub fn with_page_size(self, page_size: u32) -> Self {
        Self {
            page_size: page_size.max(1),
            current_page: 1,
            ..self
        }
    }

    pub fn window(&self) -> PageWindow {
        compute_window(self.current_page, self.page_size, self.total_items)
    }

    pub fn page_numbers(&self) -> Vec<PageMarker> {
        visible_page_numbers(self.current_page, self.total_pages())
    }

    /// Human-readable range such as `"13-24 of 40"`, or `"0 of 0"`.
    pub fn range_label(&self) -> String {
        if self.total_items == 0 {
            return "0 of 0".to_string();
        }
        let window = self.window();
        format!(
            "{}-{} of {}",
            window.start_index + 1,
            window.end_index,
            self.total_items
        )
    }
}
