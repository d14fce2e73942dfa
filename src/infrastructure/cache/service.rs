//! Cache service trait and error types.

use async_trait::async_trait;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache key of a store rendered in a given language at a given generation.
///
/// Bumping a store's generation orphans every rendering cached under the
/// previous one, including renderings written late by in-flight reads.
pub fn store_cache_key(store_code: &str, language_code: &str, generation: u64) -> String {
    format!("{}:{}:v{}", store_code, language_code, generation)
}

/// Cache key holding the current generation of a store.
pub fn store_generation_key(store_code: &str) -> String {
    format!("gen:{}", store_code)
}

/// Trait for caching serialized values by key.
///
/// Implementations must be thread-safe and handle errors gracefully without
/// disrupting the application (cache failures should degrade to database lookups).
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves a cached value.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))` on cache hit
    /// - `Ok(None)` on cache miss or error (fail-open behavior)
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Stores a value with optional TTL in seconds
    /// (implementation-specific default if `None`).
    ///
    /// # Errors
    ///
    /// Should not propagate errors to callers. Implementations should log errors
    /// and return `Ok(())` to avoid disrupting the request flow.
    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> CacheResult<()>;

    /// Removes cached values. Used when a store is modified or deleted.
    async fn invalidate(&self, keys: &[String]) -> CacheResult<()>;

    /// Reads the counter stored under `key`, `0` when absent.
    ///
    /// # Errors
    ///
    /// Unlike [`CacheService::get`], backend failures are returned: a reader
    /// that cannot see the current generation must bypass the cache.
    async fn generation(&self, key: &str) -> CacheResult<u64>;

    /// Atomically increments the counter stored under `key` and returns the
    /// new value.
    async fn bump_generation(&self, key: &str) -> CacheResult<u64>;

    /// Checks if the cache backend is healthy.
    ///
    /// Used by health check endpoints to report cache status.
    async fn health_check(&self) -> bool;
}
