//! Handlers for store branding and marketing endpoints.

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
};
use validator::Validate;

use crate::api::dto::marketing::{ReadableBrand, UpdateBrandRequest};
use crate::api::handlers::store::{ensure_authorized, log_internal};
use crate::domain::entities::{Principal, StoreConfiguration};
use crate::error::AppError;
use crate::state::AppState;

/// Returns the store logo and social network links.
///
/// # Endpoint
///
/// `GET /api/v1/private/store/{code}/marketing`
///
/// # Errors
///
/// - 403 Forbidden if the caller may not administer this store
/// - 404 Not Found if the store does not exist
pub async fn store_marketing_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<ReadableBrand>, AppError> {
    ensure_authorized(&state, &principal, &code).await?;

    let language = state.language_service.default_language().await?;
    let brand = state.store_service.brand(&code, &language).await?;

    Ok(Json(brand.into()))
}

/// Replaces the store's social network links.
///
/// # Endpoint
///
/// `PUT /api/v1/private/store/{code}/marketing`
///
/// # Request Body
///
/// ```json
/// {
///   "socialNetworks": [
///     { "key": "facebook", "value": "https://facebook.com/acme", "active": true }
///   ]
/// }
/// ```
///
/// # Errors
///
/// - 400 Bad Request if an entry is invalid or a key repeats
/// - 403 Forbidden if the caller may not administer this store
/// - 404 Not Found if the store does not exist
pub async fn update_store_marketing_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<UpdateBrandRequest>, JsonRejection>,
) -> Result<Json<ReadableBrand>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    ensure_authorized(&state, &principal, &code).await?;

    let entries: Vec<StoreConfiguration> = payload
        .social_networks
        .into_iter()
        .map(StoreConfiguration::from)
        .collect();

    let language = state.language_service.default_language().await?;
    let brand = state
        .store_service
        .replace_social_networks(&code, entries, &language)
        .await
        .inspect_err(|e| log_internal(e, "Error while updating store marketing"))?;

    Ok(Json(brand.into()))
}
