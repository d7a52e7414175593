use serde::Serialize;

/// One page of a result sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: u32,
    pub total_pages: usize,
    pub total_count: usize,
}

/// Slices `items` into `page_size` pages. Pages past the end are empty, not an error.
pub fn paginate<T: Clone>(items: &[T], page: u32, page_size: usize) -> Page<T> {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let total_count = items.len();
    let start = (page as usize - 1).saturating_mul(page_size);

    let slice = items
        .get(start..)
        .map(|rest| &rest[..rest.len().min(page_size)])
        .unwrap_or_default();

    Page {
        items: slice.to_vec(),
        current_page: page,
        total_pages: total_count.div_ceil(page_size),
        total_count,
    }
}
