// ── Derived views ──
//
// Pure functions from (collection, query, page) to what a list shows.
// Nothing here holds state; the list controller calls these on every read.

use serde::Serialize;

use crate::model::{RecordId, Searchable};

// ── Filtering ───────────────────────────────────────────────────────

/// Predicate inputs of a list view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub search: String,
    pub owner: Option<RecordId>,
}

impl ListQuery {
    /// Case-insensitive substring match on the search fields, AND'ed
    /// with owner equality. Items without an owner key ignore the owner
    /// filter.
    pub fn matches<T: Searchable + ?Sized>(&self, item: &T) -> bool {
        self.matches_owner(item) && self.matches_search(item)
    }

    fn matches_owner<T: Searchable + ?Sized>(&self, item: &T) -> bool {
        match (self.owner, item.owner()) {
            (Some(wanted), Some(actual)) => wanted == actual,
            _ => true,
        }
    }

    fn matches_search<T: Searchable + ?Sized>(&self, item: &T) -> bool {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        item.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty() && self.owner.is_none()
    }
}

/// Order-preserving subset of `items` matching `query`.
pub fn filter_rows<'a, T: Searchable>(items: &'a [T], query: &ListQuery) -> Vec<&'a T> {
    items.iter().filter(|item| query.matches(*item)).collect()
}

// ── Pagination ──────────────────────────────────────────────────────

/// Number of pages needed for `total_items`. Zero items means zero pages.
pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total_items.div_ceil(page_size)
}

/// Clamp a 1-based page into `[1, total_pages]`, never below 1.
pub fn clamp_page(page: usize, total_items: usize, page_size: usize) -> usize {
    page.clamp(1, total_pages(total_items, page_size).max(1))
}

/// The slice `[(page-1)*size, page*size)` of `items`, without clamping.
///
/// A page past the end yields an empty slice.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let start = page.saturating_sub(1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Position summary of one page ("Showing X to Y of N").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub page_size: usize,
    /// 1-based index of the first item shown; 0 when nothing is shown.
    pub first_item: usize,
    /// 1-based index of the last item shown; 0 when nothing is shown.
    pub last_item: usize,
}

impl PageInfo {
    /// Summary for the clamped `page`.
    pub fn new(page: usize, total_items: usize, page_size: usize) -> Self {
        let page = clamp_page(page, total_items, page_size);
        let (first_item, last_item) = if total_items == 0 {
            (0, 0)
        } else {
            let first = (page - 1) * page_size + 1;
            (first, (page * page_size).min(total_items))
        };
        Self {
            page,
            total_pages: total_pages(total_items, page_size),
            total_items,
            page_size,
            first_item,
            last_item,
        }
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Page numbers a pagination control shows: at most `max_visible`,
/// centered on `current` and shifted to stay within `[1, total]`.
pub fn page_window(current: usize, total: usize, max_visible: usize) -> Vec<usize> {
    if total == 0 || max_visible == 0 {
        return Vec::new();
    }
    if total <= max_visible {
        return (1..=total).collect();
    }
    let current = current.clamp(1, total);
    let half = max_visible / 2;
    let mut start = current.saturating_sub(half).max(1);
    let mut end = start + max_visible - 1;
    if end > total {
        end = total;
        start = total + 1 - max_visible;
    }
    (start..=end).collect()
}
