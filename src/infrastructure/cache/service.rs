//! Cache service trait and error types.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Selects one of the two independent keyspaces.
///
/// `Url` entries map an original URL to its short code (dedup on shorten),
/// `Code` entries map a short code to its original URL (resolution).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKey<'a> {
    Url(&'a str),
    Code(&'a str),
}

impl CacheKey<'_> {
    /// Namespaced key string, e.g. `code:abc123`.
    pub fn namespaced(&self) -> String {
        match self {
            CacheKey::Url(url) => format!("url:{}", url),
            CacheKey::Code(code) => format!("code:{}", code),
        }
    }
}

/// Trait for caching url mappings in both directions.
///
/// The cache is never authoritative. Callers treat read errors as misses and
/// ignore write errors, since the registry can always answer.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::MemoryCache`] - In-process cache
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Returns the cached short code for an original URL.
    async fn get_by_url(&self, original_url: &str) -> CacheResult<Option<String>> {
        self.get(CacheKey::Url(original_url)).await
    }

    /// Returns the cached original URL for a short code.
    async fn get_by_code(&self, short_code: &str) -> CacheResult<Option<String>> {
        self.get(CacheKey::Code(short_code)).await
    }

    /// Raw keyspace lookup. `Ok(None)` on miss or expired entry.
    async fn get(&self, key: CacheKey<'_>) -> CacheResult<Option<String>>;

    /// Stores `value` under `key`, overwriting any entry and resetting its TTL.
    async fn put(&self, key: CacheKey<'_>, value: &str, ttl: Duration) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;
}
