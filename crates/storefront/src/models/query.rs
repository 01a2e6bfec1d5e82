//! Listing query parameters.
//!
//! Limits are clamped rather than rejected; pages start at 1.

use axum::extract::{FromRequestParts, Query};
use serde::Deserialize;

use crate::error::AppError;

/// Default size of a bounded listing.
pub const DEFAULT_LIST_LIMIT: i64 = 10;

/// Default page size of a paginated listing.
pub const DEFAULT_PAGE_LIMIT: i64 = 20;

/// Largest accepted limit.
pub const MAX_LIMIT: i64 = 100;

/// `?limit=` for bounded listings.
#[derive(Debug, Default, Deserialize, FromRequestParts)]
#[from_request(via(Query), rejection(AppError))]
pub struct ListQuery {
    pub limit: Option<i64>,
}

impl ListQuery {
    /// Effective limit.
    #[must_use]
    pub fn limit(&self) -> i64 {
        clamp_limit(self.limit, DEFAULT_LIST_LIMIT)
    }
}

/// `?page=&limit=&search=` for paginated listings.
#[derive(Debug, Default, Deserialize, FromRequestParts)]
#[from_request(via(Query), rejection(AppError))]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
}

impl PageQuery {
    /// Effective page number, starting at 1.
    #[must_use]
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Effective page size.
    #[must_use]
    pub fn limit(&self) -> i64 {
        clamp_limit(self.limit, DEFAULT_PAGE_LIMIT)
    }

    /// Rows to skip for the current page.
    #[must_use]
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.limit())
    }

    /// Search term, if one was given.
    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

fn clamp_limit(raw: Option<i64>, default: i64) -> i64 {
    raw.unwrap_or(default).clamp(1, MAX_LIMIT)
}
