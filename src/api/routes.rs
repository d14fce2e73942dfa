//! API route configuration.
//!
//! Routes under `/private` require Bearer token authentication via
//! [`crate::api::middleware::auth`]; the rest are public.

use crate::api::handlers::{
    create_store_handler, delete_store_handler, get_store_handler, health_handler,
    store_exists_handler, store_list_handler, store_marketing_handler, update_store_handler,
    update_store_marketing_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};

/// Routes reachable without authentication.
///
/// # Endpoints
///
/// - `GET /store/{store}?lang=` - Store rendered in a language
/// - `GET /health`              - Health check: DB and cache
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/store/{store}", get(get_store_handler))
        .route("/health", get(health_handler))
}

/// Store administration routes, protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `POST   /private/store`                  - Create a store
/// - `GET    /private/store/unique?code=`     - Check whether a code is taken
/// - `PUT    /private/store/{code}`           - Replace a store
/// - `DELETE /private/store/{code}`           - Delete a store
/// - `GET    /private/store/{code}/marketing` - Logo and social networks
/// - `PUT    /private/store/{code}/marketing` - Replace social networks
/// - `GET    /private/stores`                 - Filtered, paginated listing
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/private/store", post(create_store_handler))
        .route("/private/store/unique", get(store_exists_handler))
        .route(
            "/private/store/{code}",
            put(update_store_handler).delete(delete_store_handler),
        )
        .route(
            "/private/store/{code}/marketing",
            get(store_marketing_handler).put(update_store_marketing_handler),
        )
        .route("/private/stores", get(store_list_handler))
}
