//! Handler for the paginated store listing.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};

use crate::api::dto::store::ReadableMerchantStore;
use crate::api::dto::store_list::{ReadableMerchantStoreList, StoreListParams};
use crate::api::handlers::store::log_internal;
use crate::error::AppError;
use crate::state::AppState;

/// Lists stores with filtering, sorting and pagination.
///
/// # Endpoint
///
/// `GET /api/v1/private/stores`
///
/// # Query Parameters
///
/// - `start` - Offset of the first store (default: 0)
/// - `length` - Page size, 1 to 1000 (default: 25)
/// - `code`, `name` - Case-insensitive substring filters, combined with AND
/// - `search` - Matches code or name; replaces `code` and `name`
/// - `orderBy` - `id`, `code`, `name`, `readableAudit.user` or `inBusinessSince`
/// - `direction` - `asc` (default) or `desc`
/// - `draw` - Echoed back in the response
///
/// # Example
///
/// ```text
/// GET /api/v1/private/stores?search=acme&orderBy=name&direction=desc&length=10
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request for invalid parameters.
pub async fn store_list_handler(
    State(state): State<AppState>,
    params: Result<Query<StoreListParams>, QueryRejection>,
) -> Result<Json<ReadableMerchantStoreList>, AppError> {
    let Query(params) = params?;

    let criteria = params.to_criteria()?;
    let draw = params.draw()?;
    let page_length = criteria.max_count;

    let language = state.language_service.default_language().await?;
    let languages = state.language_service.languages().await?;

    let page = state
        .store_service
        .get_by_criteria(criteria, &language)
        .await
        .inspect_err(|e| log_internal(e, "Error while listing stores"))?;

    let data = page
        .items
        .into_iter()
        .map(|store| ReadableMerchantStore::from_store(store, &languages))
        .collect();

    Ok(Json(ReadableMerchantStoreList::new(
        data,
        page.total_count,
        page_length,
        draw,
    )))
}
