//! API response envelope
//!
//! Every successful response has the shape:
//! ```json
//! {
//!     "code": 200,
//!     "status": "OK",
//!     "message": "Login successful",
//!     "data": { ... },
//!     "pagination": { ... }
//! }
//! ```
//! Errors use [`crate::error::ErrorResponse`].

use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Default page size when the client omits `limit`
pub const DEFAULT_PAGE_LIMIT: u32 = 10;
/// Largest page size a client may request
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Unified success envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// HTTP status code mirrored in the body
    pub code: u16,
    /// Canonical reason phrase for `code`
    pub status: String,
    /// Human-readable message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> ApiResponse<T> {
    fn with_status(status: StatusCode, message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            code: status.as_u16(),
            status: status.canonical_reason().unwrap_or_default().to_string(),
            message: message.into(),
            data,
            pagination: None,
        }
    }

    /// 200 with data
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self::with_status(StatusCode::OK, message, Some(data))
    }

    /// 201 with data
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self::with_status(StatusCode::CREATED, message, Some(data))
    }

    /// Attach pagination metadata
    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

impl ApiResponse<()> {
    /// 200 without data
    pub fn message(message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::OK, message, None)
    }
}

impl<T: Serialize> axum::response::IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::OK);
        (status, axum::Json(self)).into_response()
    }
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Current page number (1-based)
    pub current_page: u32,
    /// Items per page
    pub limit: u32,
    /// Total number of items across all pages
    pub total_items: u64,
    /// Total number of pages
    pub total_pages: u32,
    pub has_next_page: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page: Option<u32>,
}

impl Pagination {
    pub fn new(current_page: u32, limit: u32, total_items: u64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            total_items.div_ceil(limit as u64) as u32
        };
        let has_next_page = current_page < total_pages;
        Self {
            current_page,
            limit,
            total_items,
            total_pages,
            has_next_page,
            next_page: has_next_page.then_some(current_page + 1),
        }
    }
}

/// `page` / `limit` query parameters shared by every listing endpoint
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Validated page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u32,
    pub limit: u32,
}

impl PageWindow {
    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.limit as i64
    }

    pub fn pagination(&self, total_items: u64) -> Pagination {
        Pagination::new(self.page, self.limit, total_items)
    }
}

impl PageQuery {
    /// Apply defaults (page 1, limit 10) and reject out-of-range values
    pub fn window(&self) -> Result<PageWindow, AppError> {
        let page = self.page.unwrap_or(1);
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
        if page < 1 {
            return Err(AppError::validation("page must be at least 1").with_field(
                "page",
                "must be at least 1",
            ));
        }
        if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
            return Err(
                AppError::validation(format!("limit must be between 1 and {MAX_PAGE_LIMIT}"))
                    .with_field("limit", format!("must be between 1 and {MAX_PAGE_LIMIT}")),
            );
        }
        Ok(PageWindow { page, limit })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_math() {
        let p = Pagination::new(1, 10, 25);
        assert_eq!(p.total_pages, 3);
        assert!(p.has_next_page);
        assert_eq!(p.next_page, Some(2));

        let last = Pagination::new(3, 10, 25);
        assert!(!last.has_next_page);
        assert_eq!(last.next_page, None);

        let empty = Pagination::new(1, 10, 0);
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_next_page);
    }

    #[test]
    fn test_page_query_defaults() {
        let window = PageQuery::default().window().unwrap();
        assert_eq!(window, PageWindow { page: 1, limit: 10 });
        assert_eq!(window.offset(), 0);

        let window = PageQuery {
            page: Some(3),
            limit: Some(20),
        }
        .window()
        .unwrap();
        assert_eq!(window.offset(), 40);
    }

    #[test]
    fn test_page_query_bounds() {
        assert!(PageQuery { page: Some(0), limit: None }.window().is_err());
        assert!(PageQuery { page: None, limit: Some(0) }.window().is_err());
        assert!(PageQuery { page: None, limit: Some(101) }.window().is_err());
        assert!(PageQuery { page: None, limit: Some(100) }.window().is_ok());
    }

    #[test]
    fn test_envelope_shape() {
        let resp = ApiResponse::created("Department created", 7)
            .with_pagination(Pagination::new(1, 10, 1));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["code"], 201);
        assert_eq!(json["status"], "Created");
        assert_eq!(json["data"], 7);
        assert_eq!(json["pagination"]["total_items"], 1);

        let json = serde_json::to_value(ApiResponse::message("Signout successful")).unwrap();
        assert!(json.get("data").is_none());
        assert!(json.get("pagination").is_none());
    }
}
