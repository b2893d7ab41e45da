use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Page number used when none (or one below 1) is requested
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when none (or one below 1) is requested
pub const DEFAULT_PAGE_SIZE: u32 = 10;

const PAGED_MESSAGE: &str = "Success";

/// Envelope carrying one page of a larger collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResponse<T> {
    status: u16,
    message: String,
    content: Vec<T>,
    page: u32,
    size: u32,
    total_elements: u64,
    total_pages: u64,
}

pub(crate) fn normalize_page(page: Option<i32>) -> u32 {
    match page {
        Some(p) if p >= 1 => p.unsigned_abs(),
        _ => DEFAULT_PAGE,
    }
}

pub(crate) fn normalize_size(size: Option<i32>) -> u32 {
    match size {
        Some(s) if s >= 1 => s.unsigned_abs(),
        _ => DEFAULT_PAGE_SIZE,
    }
}

fn total_pages(total_elements: u64, size: u32) -> u64 {
    total_elements.div_ceil(u64::from(size))
}

impl<T> PagedResponse<T> {
    fn assemble(content: Vec<T>, page: u32, size: u32, total_elements: u64) -> Self {
        Self {
            status: StatusCode::OK.as_u16(),
            message: PAGED_MESSAGE.to_string(),
            content,
            page,
            size,
            total_elements,
            total_pages: total_pages(total_elements, size),
        }
    }

    /// Slice one page out of a fully materialized collection.
    ///
    /// `page` and `size` fall back to 1 and 10 when absent or below 1. A page
    /// past the end yields empty content with the real totals.
    pub fn of(content: Vec<T>, page: Option<i32>, size: Option<i32>) -> Self {
        let page = normalize_page(page);
        let size = normalize_size(size);

        if content.is_empty() {
            return Self::assemble(Vec::new(), page, size, 0);
        }

        let total_elements = content.len() as u64;
        let from_index = u64::from(page - 1) * u64::from(size);

        if from_index >= total_elements {
            return Self::assemble(Vec::new(), page, size, total_elements);
        }

        // from_index < len, so it fits in usize
        let paged: Vec<T> = content
            .into_iter()
            .skip(from_index as usize)
            .take(size as usize)
            .collect();

        Self::assemble(paged, page, size, total_elements)
    }

    /// First page of a collection with the default page size
    pub fn of_all(content: Vec<T>) -> Self {
        Self::of(content, None, None)
    }

    /// Wrap a page that was already fetched from an external store.
    ///
    /// `content` is taken as-is and the totals come from `total_elements`
    /// (typically a separate count query); the two are not cross-checked.
    pub fn of_external(
        content: Vec<T>,
        page: Option<i32>,
        size: Option<i32>,
        total_elements: u64,
    ) -> Self {
        Self::assemble(content, normalize_page(page), normalize_size(size), total_elements)
    }

    /// [`PagedResponse::of_external`] with the default page and size
    pub fn of_external_unpaged(content: Vec<T>, total_elements: u64) -> Self {
        Self::of_external(content, None, None, total_elements)
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn content(&self) -> &[T] {
        &self.content
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn total_elements(&self) -> u64 {
        self.total_elements
    }

    pub fn total_pages(&self) -> u64 {
        self.total_pages
    }

    pub fn into_content(self) -> Vec<T> {
        self.content
    }
}

impl<T: Serialize> IntoResponse for PagedResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}
