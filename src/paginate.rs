use serde::{Deserialize, Serialize};

pub const PAGE_SIZE: usize = 6;

/// Up to this many pages the selector lists every page.
const MAX_VISIBLE: usize = 5;

pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

/// Records on 1-indexed `page`. Out-of-range pages give an empty slice.
pub fn paginate<T>(records: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= records.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(records.len());
    &records[start..end]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageItem {
    Page(usize),
    Ellipsis,
}

/// Entries of the page selector for `current` out of `total` pages.
pub fn page_numbers(current: usize, total: usize) -> Vec<PageItem> {
    if total <= MAX_VISIBLE {
        return (1..=total).map(PageItem::Page).collect();
    }

    let mut items = vec![PageItem::Page(1)];
    if current > 3 {
        items.push(PageItem::Ellipsis);
    }

    let start = current.saturating_sub(1).max(2);
    let end = (current + 1).min(total - 1);
    for p in start..=end {
        if !items.contains(&PageItem::Page(p)) {
            items.push(PageItem::Page(p));
        }
    }

    if current + 2 < total {
        items.push(PageItem::Ellipsis);
    }
    if !items.contains(&PageItem::Page(total)) {
        items.push(PageItem::Page(total));
    }
    items
}

/// What a page change asks of the view, in order: the new page is already
/// stored when `scroll_to_top` is seen. No scroll when the page stayed put.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageChange {
    pub page: usize,
    pub scroll_to_top: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    pub current_page: usize,
    pub page_size: usize,
    pub total: usize,
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(0)
    }
}

impl PageState {
    pub fn new(total: usize) -> Self {
        Self {
            current_page: 1,
            page_size: PAGE_SIZE,
            total,
        }
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.total, self.page_size)
    }

    fn clamp(&self, page: usize) -> usize {
        page.clamp(1, self.total_pages().max(1))
    }

    /// Move to `page`, clamped into `[1, max(1, total_pages)]`.
    pub fn go_to(&mut self, page: usize) -> PageChange {
        let previous = self.current_page;
        self.current_page = self.clamp(page);
        PageChange {
            page: self.current_page,
            scroll_to_top: self.current_page != previous,
        }
    }

    pub fn prev(&mut self) -> PageChange {
        self.go_to(self.current_page.saturating_sub(1))
    }

    pub fn next(&mut self) -> PageChange {
        self.go_to(self.current_page + 1)
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    /// The selector is only drawn when there is more than one page.
    pub fn needs_selector(&self) -> bool {
        self.total_pages() > 1
    }

    pub fn visible<'a, T>(&self, records: &'a [T]) -> &'a [T] {
        paginate(records, self.current_page, self.page_size)
    }

    pub fn items(&self) -> Vec<PageItem> {
        page_numbers(self.current_page, self.total_pages())
    }
}
