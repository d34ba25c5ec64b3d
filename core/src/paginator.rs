use crate::error::{Result, SearchError};
use std::fmt;
use std::slice::Chunks;

/// One page: a bounded sub-slice of the paginated sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page<'a, T>(&'a [T]);

impl<'a, T> Page<'a, T> {
    pub fn items(&self) -> &'a [T] { self.0 }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl<T: fmt::Display> fmt::Display for Page<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|item| write!(f, "{item}"))
    }
}

/// Lazy iterator over pages of an already ordered slice.
#[derive(Debug, Clone)]
pub struct Paginator<'a, T> {
    chunks: Chunks<'a, T>,
}

impl<'a, T> Iterator for Paginator<'a, T> {
    type Item = Page<'a, T>;

    fn next(&mut self) -> Option<Self::Item> { self.chunks.next().map(Page) }

    fn size_hint(&self) -> (usize, Option<usize>) { self.chunks.size_hint() }
}

impl<T> ExactSizeIterator for Paginator<'_, T> {}

/// Split `items` into pages of at most `page_size` elements. An empty slice has no pages.
pub fn paginate<T>(items: &[T], page_size: usize) -> Result<Paginator<'_, T>> {
    if page_size == 0 {
        return Err(SearchError::invalid("page size must be positive"));
    }
    Ok(Paginator { chunks: items.chunks(page_size) })
}
