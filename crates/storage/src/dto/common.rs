use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Copy, Deserialize, IntoParams, ToSchema)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    20
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl PaginationParams {
    pub fn validate(&self) -> Result<(), String> {
        if self.page < 1 {
            return Err("page must be >= 1".to_string());
        }
        if self.limit < 1 || self.limit > 100 {
            return Err("limit must be between 1 and 100".to_string());
        }
        Ok(())
    }

    pub fn offset(&self) -> i64 {
        ((self.page - 1) * self.limit) as i64
    }

    pub fn limit(&self) -> i64 {
        self.limit as i64
    }
}

/// Pagination block shared by every list endpoint. Computed from the
/// filtered total only, never from the unfiltered table count.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_count: i64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl PageInfo {
    pub fn new(page: u32, limit: u32, total_count: i64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            ((total_count as f64) / (limit as f64)).ceil() as u32
        };

        Self {
            current_page: page,
            total_pages,
            total_count,
            has_next_page: page < total_pages,
            has_prev_page: page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_is_ceiling_of_count_over_limit() {
        assert_eq!(PageInfo::new(1, 20, 0).total_pages, 0);
        assert_eq!(PageInfo::new(1, 20, 20).total_pages, 1);
        assert_eq!(PageInfo::new(1, 20, 21).total_pages, 2);
        assert_eq!(PageInfo::new(1, 20, 25).total_pages, 2);
        assert_eq!(PageInfo::new(1, 7, 15).total_pages, 3);
    }

    #[test]
    fn next_and_prev_flags_follow_page_position() {
        let first = PageInfo::new(1, 20, 25);
        assert!(first.has_next_page);
        assert!(!first.has_prev_page);

        let last = PageInfo::new(2, 20, 25);
        assert!(!last.has_next_page);
        assert!(last.has_prev_page);
    }

    #[test]
    fn empty_result_has_no_next_page() {
        let info = PageInfo::new(1, 20, 0);
        assert!(!info.has_next_page);
        assert!(!info.has_prev_page);
    }

    #[test]
    fn params_validate_bounds() {
        assert!(PaginationParams { page: 0, limit: 20 }.validate().is_err());
        assert!(PaginationParams { page: 1, limit: 0 }.validate().is_err());
        assert!(
            PaginationParams {
                page: 1,
                limit: 101
            }
            .validate()
            .is_err()
        );
        assert!(PaginationParams { page: 3, limit: 50 }.validate().is_ok());
    }

    #[test]
    fn offset_is_zero_based() {
        let params = PaginationParams { page: 3, limit: 20 };
        assert_eq!(params.offset(), 40);
        assert_eq!(params.limit(), 20);
    }
}
