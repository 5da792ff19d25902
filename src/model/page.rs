use serde::{Deserialize, Serialize};

/// Largest page size the server accepts.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Pagination block sent next to `data` by list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

/// Decoded list payload. `meta` is present only when the server wrapped the
/// list in an envelope that carried one.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub meta: Option<PageMeta>,
}

impl<T> Listing<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Optional paging for list calls. Unset fields leave the server defaults
/// in place and send no query parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.max(1).to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.clamp(1, MAX_PAGE_LIMIT).to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paging_sends_nothing() {
        assert!(PageRequest::default().query_pairs().is_empty());
    }

    #[test]
    fn paging_is_clamped_to_server_bounds() {
        let pairs = PageRequest::new(0, 500).query_pairs();
        assert_eq!(
            pairs,
            vec![("page", "1".to_string()), ("limit", "100".to_string())]
        );
    }
}
