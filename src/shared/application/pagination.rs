/// Pagination support for catalog listings
///
/// Standard pagination model shared by every resource kind
use serde::{Deserialize, Serialize};

/// Pagination metadata as reported by the catalog API
///
/// Field names follow the API (`totalItemsPerPage`, camelCase). Every field is
/// optional on the wire; `RawPagination::normalize` fills the gaps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPagination {
    #[serde(default)]
    pub total_items: Option<u64>,
    #[serde(default, alias = "itemsPerPage")]
    pub total_items_per_page: Option<u32>,
    #[serde(default)]
    pub current_page: Option<u32>,
    #[serde(default)]
    pub total_pages: Option<u32>,
}

impl RawPagination {
    /// Resolve into a `Pagination` that satisfies its invariants.
    ///
    /// `total_pages` from the server wins when present; otherwise it is
    /// derived from `total_items / items_per_page`.
    pub fn normalize(&self, requested_page: u32, default_page_size: u32) -> Pagination {
        let items_per_page = self
            .total_items_per_page
            .filter(|size| *size > 0)
            .unwrap_or_else(|| default_page_size.max(1));
        let total_items = self.total_items.unwrap_or(0);
        let total_pages = self
            .total_pages
            .unwrap_or_else(|| Pagination::derive_total_pages(total_items, items_per_page));
        let current_page = self
            .current_page
            .filter(|page| *page > 0)
            .unwrap_or(requested_page.max(1))
            .min(total_pages.max(1));

        Pagination {
            total_items,
            items_per_page,
            current_page,
            total_pages,
        }
    }
}

/// Normalized pagination state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total_items: u64,
    pub items_per_page: u32,
    pub current_page: u32,
    pub total_pages: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            total_items: 0,
            items_per_page: 20,
            current_page: 1,
            total_pages: 0,
        }
    }
}

impl Pagination {
    /// Pagination for a list that was delivered without any metadata
    pub fn derived(item_count: usize, requested_page: u32, page_size: u32) -> Self {
        RawPagination {
            total_items: Some(item_count as u64),
            total_items_per_page: Some(page_size),
            current_page: Some(requested_page),
            total_pages: None,
        }
        .normalize(requested_page, page_size)
    }

    /// `ceil(total_items / items_per_page)`
    pub fn derive_total_pages(total_items: u64, items_per_page: u32) -> u32 {
        let per_page = u64::from(items_per_page.max(1));
        total_items.div_ceil(per_page) as u32
    }

    pub fn has_next_page(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_previous_page(&self) -> bool {
        self.current_page > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_total_pages_when_server_omits_it() {
        let raw = RawPagination {
            total_items: Some(45),
            total_items_per_page: Some(20),
            current_page: Some(1),
            total_pages: None,
        };
        let pagination = raw.normalize(1, 20);
        assert_eq!(pagination.total_pages, 3);
    }

    #[test]
    fn server_total_pages_is_authoritative() {
        let raw = RawPagination {
            total_items: Some(45),
            total_items_per_page: Some(20),
            current_page: Some(2),
            total_pages: Some(10),
        };
        assert_eq!(raw.normalize(2, 20).total_pages, 10);
    }

    #[test]
    fn missing_fields_fall_back_to_request() {
        let pagination = RawPagination::default().normalize(1, 24);
        assert_eq!(pagination.items_per_page, 24);
        assert_eq!(pagination.current_page, 1);
        assert_eq!(pagination.total_pages, 0);
    }

    #[test]
    fn current_page_is_clamped_into_range() {
        let raw = RawPagination {
            total_items: Some(10),
            total_items_per_page: Some(10),
            current_page: Some(7),
            total_pages: Some(1),
        };
        assert_eq!(raw.normalize(7, 10).current_page, 1);
    }

    #[test]
    fn zero_page_size_is_never_used() {
        let raw = RawPagination {
            total_items: Some(5),
            total_items_per_page: Some(0),
            ..Default::default()
        };
        let pagination = raw.normalize(1, 0);
        assert_eq!(pagination.items_per_page, 1);
        assert_eq!(pagination.total_pages, 5);
    }

    #[test]
    fn accepts_items_per_page_alias() {
        let raw: RawPagination =
            serde_json::from_str(r#"{"totalItems": 40, "itemsPerPage": 10}"#).unwrap();
        assert_eq!(raw.normalize(1, 20).total_pages, 4);
    }

    #[test]
    fn next_and_previous_flags() {
        let pagination = Pagination {
            total_items: 45,
            items_per_page: 20,
            current_page: 2,
            total_pages: 3,
        };
        assert!(pagination.has_next_page());
        assert!(pagination.has_previous_page());
    }
}
