//! Page/limit pagination shared by every list operation.

use serde::{Deserialize, Serialize};

use crate::validation::ValidationErrors;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;

/// A validated page request. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    limit: u64,
}

impl PageRequest {
    /// Validate raw `page`/`limit` values, applying defaults for absent ones.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let page = match page {
            None => DEFAULT_PAGE,
            Some(p) if p >= 1 => p as u64,
            Some(_) => {
                errors.add("page", "Page must be greater than or equal to 1");
                DEFAULT_PAGE
            }
        };

        let limit = match limit {
            None => DEFAULT_LIMIT,
            Some(l) if (1..=MAX_LIMIT as i64).contains(&l) => l as u64,
            Some(_) => {
                errors.add("limit", format!("Limit must be between 1 and {MAX_LIMIT}"));
                DEFAULT_LIMIT
            }
        };

        errors.finish(Self { page, limit })
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.limit
    }

    /// Describe a fetched page.
    ///
    /// `hasMore` only reports whether the page came back full; it does not probe
    /// for a following row, so a final page of exactly `limit` rows reports `true`.
    pub fn info(&self, returned: usize) -> PageInfo {
        PageInfo {
            page: self.page,
            limit: self.limit,
            has_more: returned as u64 == self.limit,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// The pagination block returned alongside list results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: u64,
    pub limit: u64,
    pub has_more: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let page = PageRequest::new(None, None).unwrap();
        assert_eq!(page.page(), 1);
        assert_eq!(page.limit(), 10);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_offset() {
        let page = PageRequest::new(Some(3), Some(25)).unwrap();
        assert_eq!(page.offset(), 50);
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let errors = PageRequest::new(Some(0), Some(101)).unwrap_err();
        assert!(errors.get("page").is_some());
        assert!(errors.get("limit").is_some());
        assert!(PageRequest::new(Some(1), Some(0)).is_err());
        assert!(PageRequest::new(Some(1), Some(100)).is_ok());
    }

    #[test]
    fn test_has_more_tracks_full_pages() {
        for limit in [1, 7, 100] {
            let page = PageRequest::new(Some(2), Some(limit)).unwrap();
            assert!(page.info(limit as usize).has_more);
            assert!(!page.info(limit as usize - 1).has_more);
        }
    }
}
