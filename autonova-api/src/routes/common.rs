/// Helpers shared by the resource routes
///
/// Pagination parameters and the translation from `validator` errors to
/// the API's field-error shape.

use serde::Deserialize;

use crate::error::{ApiError, FieldError};

/// Default page size when the client does not ask for one
pub const DEFAULT_PER_PAGE: i64 = 20;

/// Hard ceiling on page size
pub const MAX_PER_PAGE: i64 = 100;

/// Pagination query parameters
///
/// `page` is 1-based and clamped to at least 1; `per_page` defaults to 20
/// and is clamped to 1..=100.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl PageParams {
    /// Effective page number (1-based)
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Effective page size
    pub fn per_page(&self) -> i64 {
        self.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE)
    }

    /// SQL LIMIT
    pub fn limit(&self) -> i64 {
        self.per_page()
    }

    /// SQL OFFSET
    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.per_page()
    }
}

/// Number of pages needed for `total` rows at `per_page` rows per page
pub fn page_count(total: i64, per_page: i64) -> i64 {
    if total <= 0 {
        return 0;
    }
    (total + per_page - 1) / per_page
}

/// Flattens `validator` errors into the API's field-error list
pub fn validation_error(errors: validator::ValidationErrors) -> ApiError {
    let details: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Validation failed".to_string()),
            })
        })
        .collect();

    ApiError::Validation(details)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_defaults() {
        let params = PageParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.per_page(), 20);
        assert_eq!(params.limit(), 20);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_per_page_is_clamped() {
        let params = PageParams {
            page: Some(1),
            per_page: Some(1000),
        };
        assert_eq!(params.per_page(), MAX_PER_PAGE);

        let params = PageParams {
            page: Some(1),
            per_page: Some(0),
        };
        assert_eq!(params.per_page(), 1);
    }

    #[test]
    fn test_page_is_clamped() {
        let params = PageParams {
            page: Some(0),
            per_page: None,
        };
        assert_eq!(params.page(), 1);

        let params = PageParams {
            page: Some(-3),
            per_page: None,
        };
        assert_eq!(params.page(), 1);
    }

    #[test]
    fn test_offset() {
        let params = PageParams {
            page: Some(3),
            per_page: Some(20),
        };
        assert_eq!(params.offset(), 40);
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 20), 0);
        assert_eq!(page_count(1, 20), 1);
        assert_eq!(page_count(20, 20), 1);
        assert_eq!(page_count(21, 20), 2);
        assert_eq!(page_count(100, 100), 1);
    }
}
