// src/models/common.rs

use serde::Serialize;

/// Shape of a list endpoint's response: a plain array when no paging was
/// requested, or a paginated envelope. One tagged type instead of two ad-hoc
/// shapes, so clients can normalize at the boundary.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Plain(Vec<T>),
    Paged { content: Vec<T>, total: usize },
}

impl<T> ListResponse<T> {
    /// Applies optional 1-based paging. `page` absent means the plain shape.
    pub fn paginate(items: Vec<T>, page: Option<usize>, per_page: Option<usize>) -> Self {
        match page {
            None => ListResponse::Plain(items),
            Some(page) => {
                let per_page = per_page.unwrap_or(20).max(1);
                let total = items.len();
                let start = page.saturating_sub(1) * per_page;
                let content = items
                    .into_iter()
                    .skip(start)
                    .take(per_page)
                    .collect();
                ListResponse::Paged { content, total }
            }
        }
    }
}
