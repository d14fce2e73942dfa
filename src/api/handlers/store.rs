//! Handlers for merchant store endpoints (read, create, update, delete).

use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::store::{
    EntityExists, LanguageQuery, PersistableMerchantStore, ReadableMerchantStore, StoreCodeQuery,
};
use crate::domain::entities::{Language, MerchantStore, Principal};
use crate::error::AppError;
use crate::infrastructure::cache::{store_cache_key, store_generation_key};
use crate::state::AppState;

/// Returns a store rendered in the requested language.
///
/// # Endpoint
///
/// `GET /api/v1/store/{store}?lang=fr`
///
/// An absent, blank or unknown `lang` falls back to the default language.
///
/// # Cache Strategy
///
/// Stores flagged `useCache` are cached per `(code, language, generation)`:
///
/// - **Cache hit**: Cached rendering is returned
/// - **Cache miss**: Query DB, spawn async cache write
/// - **Cache error**: Log and fall back to DB
///
/// # Errors
///
/// Returns 404 Not Found if no store has this code.
pub async fn get_store_handler(
    Path(store_code): Path<String>,
    Query(query): Query<LanguageQuery>,
    State(state): State<AppState>,
) -> Result<Json<ReadableMerchantStore>, AppError> {
    let language = state
        .language_service
        .service_language(query.lang.as_deref())
        .await?;

    // The generation must be read before the store itself.
    let cache_key = match state.cache.generation(&store_generation_key(&store_code)).await {
        Ok(generation) => Some(store_cache_key(&store_code, &language.code, generation)),
        Err(e) => {
            tracing::warn!("Cache error for store {}: {}", store_code, e);
            None
        }
    };

    if let Some(cache_key) = cache_key.as_deref() {
        match state.cache.get(cache_key).await {
            Ok(Some(cached)) => match serde_json::from_str::<ReadableMerchantStore>(&cached) {
                Ok(readable) => {
                    tracing::debug!("Cache HIT for {}", cache_key);
                    return Ok(Json(readable));
                }
                Err(e) => tracing::warn!("Discarding unreadable cache entry {}: {}", cache_key, e),
            },
            Ok(None) => tracing::debug!("Cache MISS for {}", cache_key),
            Err(e) => tracing::warn!("Cache error for {}: {}", cache_key, e),
        }
    }

    let store = state
        .store_service
        .get_by_code(&store_code, &language)
        .await?;
    let readable = render(&state, store).await?;

    if let Some(cache_key) = cache_key
        && readable.use_cache
    {
        match serde_json::to_string(&readable) {
            Ok(payload) => {
                // Fire-and-forget
                let cache = state.cache.clone();
                tokio::spawn(async move {
                    if let Err(e) = cache.set(&cache_key, &payload, None).await {
                        tracing::error!("Failed to cache store: {}", e);
                    }
                });
            }
            Err(e) => tracing::error!("Failed to serialize store for cache: {}", e),
        }
    }

    Ok(Json(readable))
}

/// Creates a store.
///
/// # Endpoint
///
/// `POST /api/v1/private/store`
///
/// # Response
///
/// 201 Created with the store rendered in the default language.
///
/// # Errors
///
/// - 400 Bad Request if validation fails or a reference is unknown
/// - 409 Conflict if the code is taken
pub async fn create_store_handler(
    State(state): State<AppState>,
    payload: Result<Json<PersistableMerchantStore>, JsonRejection>,
) -> Result<(StatusCode, Json<ReadableMerchantStore>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let language = state.language_service.default_language().await?;

    let store = state
        .store_service
        .create(payload.into_new_store(), &language)
        .await
        .inspect_err(|e| log_internal(e, "Error while creating store"))?;

    Ok((StatusCode::CREATED, Json(render(&state, store).await?)))
}

/// Replaces a store's attributes.
///
/// # Endpoint
///
/// `PUT /api/v1/private/store/{code}`
///
/// The path code is authoritative; a body `code` that differs is rejected.
/// The store is stamped with the authenticated user as its modifier.
///
/// # Cache
///
/// Cached renderings of the store are invalidated in every language.
///
/// # Errors
///
/// - 400 Bad Request if validation fails, codes differ, or the store would be
///   its own parent
/// - 403 Forbidden if the caller may not administer this store
/// - 404 Not Found if the store does not exist
pub async fn update_store_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<PersistableMerchantStore>, JsonRejection>,
) -> Result<Json<ReadableMerchantStore>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    if payload.code != code {
        return Err(AppError::bad_request(
            "Store code in body does not match path",
            json!({ "path": code, "body": payload.code }),
        ));
    }

    ensure_authorized(&state, &principal, &code).await?;

    let language = state.language_service.default_language().await?;

    let store = state
        .store_service
        .update(&code, payload.into_update(&principal.user_name), &language)
        .await
        .inspect_err(|e| log_internal(e, "Error while updating store"))?;

    invalidate_store(&state, &code).await;

    Ok(Json(render(&state, store).await?))
}

/// Deletes a store.
///
/// # Endpoint
///
/// `DELETE /api/v1/private/store/{code}`
///
/// # Errors
///
/// - 400 Bad Request for the `DEFAULT` store or a store with child stores
/// - 403 Forbidden if the caller may not administer this store
/// - 404 Not Found if the store does not exist
pub async fn delete_store_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Extension(principal): Extension<Principal>,
) -> Result<StatusCode, AppError> {
    ensure_authorized(&state, &principal, &code).await?;

    state
        .store_service
        .delete(&code)
        .await
        .inspect_err(|e| log_internal(e, "Error while deleting store"))?;

    invalidate_store(&state, &code).await;

    Ok(StatusCode::NO_CONTENT)
}

/// Checks whether a store code is taken.
///
/// # Endpoint
///
/// `GET /api/v1/private/store/unique?code=acme`
///
/// # Errors
///
/// Returns 400 Bad Request if `code` is missing or blank.
pub async fn store_exists_handler(
    State(state): State<AppState>,
    query: Result<Query<StoreCodeQuery>, QueryRejection>,
) -> Result<Json<EntityExists>, AppError> {
    let Query(query) = query?;

    let code = query
        .code
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| {
            AppError::bad_request("Query parameter 'code' is required", json!({}))
        })?;

    let exists = state.store_service.exists(code).await?;

    Ok(Json(EntityExists { exists }))
}

/// Builds the readable form of a store with supported language ids.
pub(crate) async fn render(
    state: &AppState,
    store: MerchantStore,
) -> Result<ReadableMerchantStore, AppError> {
    let languages = state.language_service.languages().await?;
    Ok(ReadableMerchantStore::from_store(store, &languages))
}

/// Fails with 403 unless the principal may administer `store_code`.
pub(crate) async fn ensure_authorized(
    state: &AppState,
    principal: &Principal,
    store_code: &str,
) -> Result<(), AppError> {
    if state
        .user_service
        .authorized_store(&principal.user_name, store_code)
        .await?
    {
        return Ok(());
    }

    tracing::warn!(user = %principal.user_name, store = %store_code, "Store access denied");
    Err(AppError::forbidden(
        "User is not authorized for this store",
        json!({ "store": store_code }),
    ))
}

/// Moves a store to a new cache generation and drops the renderings cached
/// under the previous one.
///
/// Runs after the write has committed. Cache failures are logged and
/// otherwise ignored.
async fn invalidate_store(state: &AppState, store_code: &str) {
    let generation = match state
        .cache
        .bump_generation(&store_generation_key(store_code))
        .await
    {
        Ok(generation) => generation,
        Err(e) => {
            tracing::error!("Failed to invalidate cache for store {}: {}", store_code, e);
            return;
        }
    };

    let languages: Vec<Language> = match state.language_service.languages().await {
        Ok(languages) => languages,
        Err(e) => {
            tracing::error!("Failed to list languages for cache invalidation: {}", e);
            return;
        }
    };

    let keys: Vec<String> = languages
        .iter()
        .map(|l| store_cache_key(store_code, &l.code, generation.saturating_sub(1)))
        .collect();

    if let Err(e) = state.cache.invalidate(&keys).await {
        tracing::error!("Failed to drop cached renderings of store {}: {}", store_code, e);
    }
}

pub(crate) fn log_internal(error: &AppError, operation: &str) {
    if matches!(error, AppError::Internal { .. }) {
        tracing::error!(error = %error, "{}", operation);
    }
}
