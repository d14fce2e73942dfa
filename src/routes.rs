//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET /api/v1/store/{store}` - Public store read
//! - `GET /api/v1/health`        - Health check: DB, cache (public)
//! - `/api/v1/private/*`         - Store administration (Bearer token required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket (configurable for proxy deployments)
//! - **Authentication** - Bearer token on private routes
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::state::AppState;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// API version prefix.
pub const API_PREFIX: &str = "/api/v1";

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, rate limiting reads client IP from
///   `X-Forwarded-For` / `X-Real-IP` headers instead of the peer socket address;
///   enable only when the service runs behind a trusted reverse proxy
pub fn app_router(state: AppState, behind_proxy: bool) -> NormalizePath<Router> {
    let private = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer))
        .layer(rate_limit::secure_layer(behind_proxy));

    let public = api::routes::public_routes().layer(rate_limit::layer(behind_proxy));

    let router = Router::new()
        .nest(API_PREFIX, Router::new().merge(private).merge(public))
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
