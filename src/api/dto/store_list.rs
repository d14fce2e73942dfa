//! Query parameters and response of the store listing endpoint.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use serde_json::json;

use crate::api::dto::store::ReadableMerchantStore;
use crate::domain::repositories::{SortDirection, StoreCriteria, StoreSortField};
use crate::error::AppError;

pub const DEFAULT_PAGE_LENGTH: i64 = 25;
pub const MAX_PAGE_LENGTH: i64 = 1000;

/// Listing query parameters, named after the DataTables protocol.
///
/// Uses `serde_with` to parse numeric parameters from query strings.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreListParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub start: Option<i64>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub length: Option<i64>,

    pub code: Option<String>,
    pub name: Option<String>,
    pub search: Option<String>,
    pub order_by: Option<String>,
    pub direction: Option<String>,
    pub draw: Option<String>,
}

impl StoreListParams {
    /// Validates the parameters and converts them to repository criteria.
    ///
    /// # Defaults
    ///
    /// - `start`: 0
    /// - `length`: 25
    /// - `orderBy`: `id`, `direction`: `asc`
    ///
    /// # Validation
    ///
    /// - `start` must not be negative
    /// - `length` must be between 1 and 1000
    /// - `orderBy` must name a sortable field
    pub fn to_criteria(&self) -> Result<StoreCriteria, AppError> {
        let start = self.start.unwrap_or(0);
        let length = self.length.unwrap_or(DEFAULT_PAGE_LENGTH);

        if start < 0 {
            return Err(AppError::bad_request(
                "start must not be negative",
                json!({ "start": start }),
            ));
        }

        if !(1..=MAX_PAGE_LENGTH).contains(&length) {
            return Err(AppError::bad_request(
                format!("length must be between 1 and {MAX_PAGE_LENGTH}"),
                json!({ "length": length }),
            ));
        }

        let order_by = match non_blank(&self.order_by) {
            None => StoreSortField::default(),
            Some(field) => StoreSortField::from_api_field(field).ok_or_else(|| {
                AppError::bad_request("Unknown sort field", json!({ "orderBy": field }))
            })?,
        };

        let direction = match non_blank(&self.direction) {
            None => SortDirection::default(),
            Some(dir) => SortDirection::parse(dir).ok_or_else(|| {
                AppError::bad_request(
                    "direction must be 'asc' or 'desc'",
                    json!({ "direction": dir }),
                )
            })?,
        };

        let criteria = StoreCriteria::new(start, length).ordered_by(order_by, direction);

        Ok(match non_blank(&self.search) {
            Some(search) => criteria.with_search(search.to_string()),
            None => criteria
                .with_code(non_blank(&self.code).map(str::to_string))
                .with_name(non_blank(&self.name).map(str::to_string)),
        })
    }

    /// Parses the `draw` counter; blank means absent.
    pub fn draw(&self) -> Result<Option<i64>, AppError> {
        non_blank(&self.draw)
            .map(|d| {
                d.parse::<i64>().map_err(|_| {
                    AppError::bad_request("draw must be numeric", json!({ "draw": d }))
                })
            })
            .transpose()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// One page of stores.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadableMerchantStoreList {
    pub data: Vec<ReadableMerchantStore>,
    pub total_count: i64,
    pub records_total: i64,
    pub records_filtered: i64,
    pub total_pages: i64,
    /// Number of stores in `data`.
    pub number: usize,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub draw: Option<i64>,
}

impl ReadableMerchantStoreList {
    pub fn new(
        data: Vec<ReadableMerchantStore>,
        total_count: i64,
        page_length: i64,
        draw: Option<i64>,
    ) -> Self {
        let total_pages = if page_length > 0 {
            (total_count + page_length - 1) / page_length
        } else {
            0
        };

        Self {
            number: data.len(),
            data,
            total_count,
            records_total: total_count,
            records_filtered: total_count,
            total_pages,
            draw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::extract::Query;
    use axum::http::Uri;

    fn parse(query: &str) -> Result<StoreListParams, String> {
        let uri: Uri = format!("/api/v1/private/stores?{query}").parse().unwrap();
        Query::<StoreListParams>::try_from_uri(&uri)
            .map(|Query(p)| p)
            .map_err(|e| e.body_text())
    }

    fn params(query: &str) -> StoreListParams {
        parse(query).unwrap()
    }

    #[test]
    fn test_defaults() {
        let criteria = params("").to_criteria().unwrap();

        assert_eq!(criteria.start, 0);
        assert_eq!(criteria.max_count, 25);
        assert_eq!(criteria.order_by, StoreSortField::Id);
        assert_eq!(criteria.direction, SortDirection::Asc);
        assert!(criteria.code.is_none());
    }

    #[test]
    fn test_filters_match_all() {
        let criteria = params("code=ac&name=Shop&start=50&length=10")
            .to_criteria()
            .unwrap();

        assert_eq!(criteria.code.as_deref(), Some("ac"));
        assert_eq!(criteria.name.as_deref(), Some("Shop"));
        assert!(!criteria.match_any);
        assert_eq!(criteria.start, 50);
    }

    #[test]
    fn test_search_overrides_filters() {
        let criteria = params("code=ignored&search=acme").to_criteria().unwrap();

        assert_eq!(criteria.code.as_deref(), Some("acme"));
        assert_eq!(criteria.name.as_deref(), Some("acme"));
        assert!(criteria.match_any);
    }

    #[test]
    fn test_order_by_api_field() {
        let criteria = params("orderBy=readableAudit.user&direction=DESC")
            .to_criteria()
            .unwrap();

        assert_eq!(criteria.order_by, StoreSortField::AuditUser);
        assert_eq!(criteria.direction, SortDirection::Desc);
    }

    #[test]
    fn test_unknown_order_by_is_error() {
        assert!(params("orderBy=email").to_criteria().is_err());
    }

    #[test]
    fn test_length_bounds() {
        assert!(params("length=0").to_criteria().is_err());
        assert!(params("length=1001").to_criteria().is_err());
        assert!(params("length=1000").to_criteria().is_ok());
    }

    #[test]
    fn test_non_numeric_start_rejected_by_serde() {
        assert!(parse("start=abc").is_err());
    }

    #[test]
    fn test_draw_parsing() {
        assert_eq!(params("draw=3").draw().unwrap(), Some(3));
        assert_eq!(params("draw=").draw().unwrap(), None);
        assert!(params("draw=x").draw().is_err());
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let list = ReadableMerchantStoreList::new(vec![], 51, 25, Some(1));

        assert_eq!(list.total_pages, 3);
        assert_eq!(list.records_total, 51);
        assert_eq!(list.records_filtered, 51);
        assert_eq!(list.number, 0);
    }
}
