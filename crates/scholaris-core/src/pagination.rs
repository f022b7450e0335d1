//! Pagination utilities for list endpoints.
//!
//! Lists accept `limit` with either `offset` or `page`:
//!
//! - `limit`: items per page, clamped to 1..=100, default 10
//! - `offset`: items to skip, default 0
//! - `page`: 1-indexed page number; takes precedence over `offset`
//!
//! Responses carry a [`PaginationMeta`] next to the `data` array:
//!
//! ```json
//! { "data": [...], "meta": { "total": 42, "limit": 10, "page": 2, "has_more": true } }
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Default page size, matching the dashboard tables.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Query strings carry every value as text, and empty inputs mean "unset".
fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s.trim().parse::<i64>().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Metadata about a paginated response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    /// Total number of items across all pages
    pub total: i64,
    /// Items per page that was applied
    pub limit: i64,
    /// Items skipped (present for offset-based requests)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    /// Current page (present for page-based requests)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    /// Whether there are more items after this page
    pub has_more: bool,
}

impl PaginationMeta {
    /// Builds the metadata for a result set of `total` rows fetched with `params`.
    pub fn from_params(total: i64, params: &PaginationParams) -> Self {
        let limit = params.limit();
        let offset = params.offset();
        let page = params.page();

        Self {
            total,
            limit,
            offset: if page.is_some() { None } else { Some(offset) },
            page,
            has_more: offset + limit < total,
        }
    }
}

/// Query parameters for pagination.
#[derive(Debug, Clone, Hash, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Maximum number of items to return (1-100, default: 10)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
    /// Number of items to skip (default: 0, ignored if `page` is set)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub offset: Option<i64>,
    /// Page number (1-indexed)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            limit: Some(DEFAULT_PAGE_SIZE),
            offset: Some(0),
            page: None,
        }
    }
}

impl PaginationParams {
    /// Returns the effective limit, clamped to [1, 100].
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, 100)
    }

    /// Returns the effective offset, derived from `page` when present.
    #[must_use]
    pub fn offset(&self) -> i64 {
        if let Some(page) = self.page {
            (page.max(1) - 1) * self.limit()
        } else {
            self.offset.unwrap_or(0).max(0)
        }
    }

    /// Returns the page number if provided, clamped to a minimum of 1.
    #[must_use]
    pub fn page(&self) -> Option<i64> {
        self.page.map(|p| p.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_ten_rows() {
        let params = PaginationParams::default();
        assert_eq!(params.limit(), 10);
        assert_eq!(params.offset(), 0);
        assert_eq!(params.page(), None);
    }

    #[test]
    fn limit_is_clamped() {
        let low = PaginationParams {
            limit: Some(0),
            offset: None,
            page: None,
        };
        let high = PaginationParams {
            limit: Some(500),
            offset: None,
            page: None,
        };
        assert_eq!(low.limit(), 1);
        assert_eq!(high.limit(), 100);
    }

    #[test]
    fn negative_offset_is_zero() {
        let params = PaginationParams {
            limit: Some(10),
            offset: Some(-5),
            page: None,
        };
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn page_takes_precedence_over_offset() {
        let params = PaginationParams {
            limit: Some(20),
            offset: Some(7),
            page: Some(3),
        };
        assert_eq!(params.offset(), 40);
        assert_eq!(params.page(), Some(3));
    }

    #[test]
    fn page_zero_is_first_page() {
        let params = PaginationParams {
            limit: Some(10),
            offset: None,
            page: Some(0),
        };
        assert_eq!(params.offset(), 0);
        assert_eq!(params.page(), Some(1));
    }

    #[test]
    fn meta_for_page_request() {
        let params = PaginationParams {
            limit: Some(10),
            offset: None,
            page: Some(2),
        };
        let meta = PaginationMeta::from_params(25, &params);
        assert_eq!(meta.offset, None);
        assert_eq!(meta.page, Some(2));
        assert!(meta.has_more);

        let last = PaginationParams {
            page: Some(3),
            ..params
        };
        assert!(!PaginationMeta::from_params(25, &last).has_more);
    }

    #[test]
    fn meta_for_offset_request() {
        let params = PaginationParams {
            limit: Some(5),
            offset: Some(5),
            page: None,
        };
        let meta = PaginationMeta::from_params(10, &params);
        assert_eq!(meta.offset, Some(5));
        assert!(!meta.has_more);

        let json = serde_json::to_string(&meta).unwrap();
        assert!(!json.contains("page"));
    }

    #[test]
    fn deserializes_query_strings() {
        let params: PaginationParams =
            serde_json::from_str(r#"{"limit":"25","page":"2"}"#).unwrap();
        assert_eq!(params.limit(), 25);
        assert_eq!(params.offset(), 25);

        let empty: PaginationParams = serde_json::from_str(r#"{"limit":"","offset":""}"#).unwrap();
        assert_eq!(empty.limit(), 10);
        assert_eq!(empty.offset(), 0);
    }

    #[test]
    fn rejects_non_numeric_limit() {
        let result: Result<PaginationParams, _> = serde_json::from_str(r#"{"limit":"ten"}"#);
        assert!(result.is_err());
    }
}
