//! Paging and ordering for the lead listings.

use serde::{Deserialize, Serialize};
use speakerdrive_shared::{LeadSort, SortDirection, SortField};

/// Matches the page size the lead table renders.
pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;

/// Query parameters shared by `/leads` and `/leads/mine`.
///
/// Sort values are kept as raw strings so an unknown field or direction falls
/// back to the default ordering instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl PaginationParams {
    /// 1-indexed.
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> usize {
        self.per_page
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// Saturates, so a page far past the end is simply empty.
    pub fn offset(&self) -> usize {
        (self.page() - 1).saturating_mul(self.limit())
    }

    /// Newest first unless the caller asks otherwise.
    pub fn lead_sort(&self) -> LeadSort {
        let field = match self.sort_by.as_deref() {
            Some("name") => SortField::Name,
            Some("industry") => SortField::Industry,
            _ => SortField::AddedAt,
        };
        let direction = match self.sort_order.as_deref() {
            Some(order) if order.eq_ignore_ascii_case("asc") => SortDirection::Asc,
            _ => SortDirection::Desc,
        };
        LeadSort::new(field, direction)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    /// Cut one page out of an already narrowed and ordered listing.
    pub fn from_items(items: Vec<T>, params: &PaginationParams) -> Self {
        let total = items.len();
        let (page, per_page) = (params.page(), params.limit());
        let total_pages = total.div_ceil(per_page);
        let data = items
            .into_iter()
            .skip(params.offset())
            .take(per_page)
            .collect();

        Self {
            data,
            meta: PaginationMeta {
                page,
                per_page,
                total,
                total_pages,
                has_next: page < total_pages,
                has_prev: page > 1,
            },
        }
    }
}
