//! Fixed-size page slicing for the board's timed auto-advance.
//!
//! The full case list is always fetched; paging only decides which slice is
//! on screen.

/// Default number of cases per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Split `items` into pages of `page_size`. The last page may be short.
///
/// An empty list has zero pages. A page size of zero is treated as one.
pub fn paginate<T>(items: &[T], page_size: usize) -> Vec<&[T]> {
    items.chunks(page_size.max(1)).collect()
}

/// Number of pages `len` items occupy.
pub fn page_count(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1))
}

/// Current page position over a list whose length changes between polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page_size: usize,
    index: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pager {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            index: 0,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Zero-based index of the current page.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Advance one page, wrapping to the first after the last.
    pub fn advance(&mut self, len: usize) {
        let pages = page_count(len, self.page_size);
        self.index = if pages == 0 { 0 } else { (self.index + 1) % pages };
    }

    /// Step back one page, wrapping to the last before the first.
    pub fn retreat(&mut self, len: usize) {
        let pages = page_count(len, self.page_size);
        self.index = match pages {
            0 => 0,
            _ if self.index == 0 || self.index >= pages => pages - 1,
            _ => self.index - 1,
        };
    }

    /// Reset to the first page if the list shrank under the current index.
    pub fn clamp(&mut self, len: usize) {
        if self.index >= page_count(len, self.page_size) {
            self.index = 0;
        }
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }

    /// The slice of `items` on the current page (empty if there are none).
    pub fn current<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.index.saturating_mul(self.page_size).min(items.len());
        let end = start.saturating_add(self.page_size).min(items.len());
        &items[start..end]
    }
}
