//! Pagination query parameters and the list response envelope.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;

/// `?page=&pageSize=` query parameters. Both optional; out-of-range
/// values are normalized rather than rejected.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

impl PageQuery {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// Index of the first row on this page. Saturates so absurd page
    /// numbers read as an empty page instead of overflowing.
    pub fn offset(&self) -> u64 {
        (self.page() - 1).saturating_mul(self.page_size())
    }
}

/// The `{ data, total, page, pageSize }` list envelope.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
}

impl<T> Paginated<T> {
    /// Slice an already-filtered, already-ordered result set down to
    /// the requested page.
    pub fn from_rows(rows: Vec<T>, query: &PageQuery) -> Self {
        let total = rows.len() as u64;
        let data: Vec<T> = rows
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.page_size() as usize)
            .collect();

        Self {
            data,
            total,
            page: query.page(),
            page_size: query.page_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let q = PageQuery::default();
        assert_eq!(q.page(), 1);
        assert_eq!(q.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(q.offset(), 0);
    }

    #[test]
    fn page_size_is_clamped() {
        let q = PageQuery {
            page: Some(0),
            page_size: Some(10_000),
        };
        assert_eq!(q.page(), 1);
        assert_eq!(q.page_size(), MAX_PAGE_SIZE);
    }

    #[test]
    fn huge_page_numbers_saturate_instead_of_overflowing() {
        let q = PageQuery {
            page: Some(u64::MAX),
            page_size: Some(100),
        };
        assert_eq!(q.offset(), u64::MAX);

        let page = Paginated::from_rows((0..10u32).collect(), &q);
        assert_eq!(page.total, 10);
        assert!(page.data.is_empty());
    }

    #[test]
    fn slices_the_requested_page() {
        let rows: Vec<u32> = (0..45).collect();
        let q = PageQuery {
            page: Some(3),
            page_size: Some(20),
        };
        let page = Paginated::from_rows(rows, &q);
        assert_eq!(page.total, 45);
        assert_eq!(page.page, 3);
        assert_eq!(page.page_size, 20);
        assert_eq!(page.data, (40..45).collect::<Vec<u32>>());
    }

    #[test]
    fn envelope_field_names() {
        let q = PageQuery::default();
        let page = Paginated::from_rows(vec![1, 2, 3], &q);
        let v = serde_json::to_value(&page).unwrap();
        assert!(v.get("pageSize").is_some());
        assert!(v.get("total").is_some());
        assert!(v.get("data").is_some());
    }
}
