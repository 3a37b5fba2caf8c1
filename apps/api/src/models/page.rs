use serde::Serialize;

/// One page of a listing plus the totals needed to walk the rest.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, page: u32, size: u32, total_elements: i64) -> Self {
        let size_i64 = i64::from(size.max(1));
        Page {
            content,
            page,
            size,
            total_elements,
            total_pages: (total_elements + size_i64 - 1) / size_i64,
        }
    }
}
