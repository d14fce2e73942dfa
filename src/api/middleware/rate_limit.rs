//! Rate limiting middleware using token bucket algorithm.

use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::net::IpAddr;
use std::sync::Arc;
use tower_governor::{
    GovernorError, GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// Client IP key for rate limiting.
///
/// `Peer` uses the socket peer address. `Proxied` reads `X-Forwarded-For`,
/// `X-Real-IP` and `Forwarded` first and falls back to the peer address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientIpKeyExtractor {
    Peer,
    Proxied,
}

impl ClientIpKeyExtractor {
    pub fn new(behind_proxy: bool) -> Self {
        if behind_proxy {
            Self::Proxied
        } else {
            Self::Peer
        }
    }
}

impl KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        match self {
            Self::Peer => PeerIpKeyExtractor.extract(req),
            Self::Proxied => SmartIpKeyExtractor.extract(req),
        }
    }
}

type RateLimitLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

fn build(behind_proxy: bool, per_second: u64, burst_size: u32) -> RateLimitLayer {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(per_second)
            .burst_size(burst_size)
            .key_extractor(ClientIpKeyExtractor::new(behind_proxy))
            .finish()
            .expect("rate limit quota is non-zero"),
    );

    GovernorLayer::new(governor_conf)
}

/// Creates a rate limiter for public endpoints.
///
/// # Limits
///
/// - **Rate**: 2 requests per second
/// - **Burst**: 100 requests
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Key Extraction
///
/// Rate limits are applied per client IP address, see [`ClientIpKeyExtractor`].
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/store/{store}", get(get_store_handler))
///     .layer(rate_limit::layer(false));
/// ```
pub fn layer(behind_proxy: bool) -> RateLimitLayer {
    build(behind_proxy, 2, 100)
}

/// Creates a stricter rate limiter for authenticated endpoints.
///
/// # Limits
///
/// - **Rate**: 1 request per second
/// - **Burst**: 10 requests
pub fn secure_layer(behind_proxy: bool) -> RateLimitLayer {
    build(behind_proxy, 1, 10)
}
