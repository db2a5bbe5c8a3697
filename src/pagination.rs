use serde::Serialize;

/// One page of an ordered list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub total_pages: usize,
    /// Zero-based index of the first entry on the page.
    pub start_index: usize,
    /// One past the last slot of the page; may exceed `total_count`.
    pub end_index: usize,
    pub total_count: usize,
}

/// Slice `items` into the 1-based page `current_page` of `page_size` entries.
///
/// Pages past the end come back empty rather than failing; keeping the page
/// number in range is the caller's job. A zero page size yields no pages.
pub fn paginate<T>(items: &[T], current_page: usize, page_size: usize) -> Page<'_, T> {
    let total_count = items.len();
    if page_size == 0 {
        return Page {
            items: &[],
            total_pages: 0,
            start_index: 0,
            end_index: 0,
            total_count,
        };
    }
    let total_pages = total_count.div_ceil(page_size);
    let start_index = current_page.saturating_sub(1).saturating_mul(page_size);
    let end_index = start_index.saturating_add(page_size);
    let from = start_index.min(total_count);
    let to = end_index.min(total_count);
    Page {
        items: &items[from..to],
        total_pages,
        start_index,
        end_index,
        total_count,
    }
}

impl<T> Page<'_, T> {
    pub fn has_previous(&self) -> bool {
        self.start_index > 0
    }

    pub fn has_next(&self) -> bool {
        self.end_index < self.total_count
    }
}
