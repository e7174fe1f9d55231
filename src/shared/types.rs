use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub meta: Option<PaginationMeta>,
    pub errors: Option<Vec<String>>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>, meta: Option<PaginationMeta>) -> Self {
        Self {
            success: true,
            data,
            message,
            meta,
            errors: None,
        }
    }

    pub fn error(message: Option<String>, errors: Option<Vec<String>>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message,
            meta: None,
            errors,
        }
    }
}

// =============================================================================
// PAGINATION
// =============================================================================

/// Standard offset/limit pagination parameters for list endpoints.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct PaginationQuery {
    /// Maximum number of items to return (default: 100, max: 500)
    #[serde(default = "default_limit")]
    #[param(minimum = 1, maximum = 500)]
    pub limit: i64,

    /// Number of items to skip (default: 0)
    #[serde(default)]
    #[param(minimum = 0)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

impl PaginationQuery {
    /// Get clamped limit (respects MAX_PAGE_SIZE)
    pub fn limit(&self) -> i64 {
        self.limit.clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        self.offset.max(0)
    }
}

/// Pagination metadata returned alongside list payloads.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub has_more: bool,
}

impl PaginationMeta {
    pub fn new(limit: i64, offset: i64, total: i64) -> Self {
        Self {
            total,
            limit,
            offset,
            has_more: offset + limit < total,
        }
    }
}

// =============================================================================
// REQUEST METADATA
// =============================================================================

/// Client metadata recorded with sessions and activity-log entries.
#[derive(Debug, Clone, Default)]
pub struct RequestMeta {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl RequestMeta {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let ip_address = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let user_agent = headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        Self {
            ip_address,
            user_agent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_more_is_set_while_items_remain() {
        let meta = PaginationMeta::new(10, 0, 25);
        assert!(meta.has_more);

        let meta = PaginationMeta::new(10, 10, 25);
        assert!(meta.has_more);
    }

    #[test]
    fn has_more_clears_on_last_page() {
        let meta = PaginationMeta::new(10, 20, 25);
        assert!(!meta.has_more);

        let meta = PaginationMeta::new(10, 30, 25);
        assert!(!meta.has_more);
    }

    #[test]
    fn limit_is_clamped() {
        let query = PaginationQuery {
            limit: 10_000,
            offset: -5,
        };
        assert_eq!(query.limit(), MAX_PAGE_SIZE);
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn forwarded_ip_takes_first_entry() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "41.202.1.1, 10.0.0.1".parse().unwrap());
        let meta = RequestMeta::from_headers(&headers);
        assert_eq!(meta.ip_address.as_deref(), Some("41.202.1.1"));
        assert!(meta.user_agent.is_none());
    }
}
