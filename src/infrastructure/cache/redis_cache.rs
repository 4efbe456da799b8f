//! Redis-backed cache implementation.

use super::service::{CacheError, CacheKey, CacheResult, CacheService};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use std::time::Duration;
use tracing::{debug, info};

/// Redis cache for both mapping directions.
///
/// `ConnectionManager` is a multiplexed, auto-reconnecting handle; each call
/// clones it, so concurrent requests never contend on a single connection.
pub struct RedisCache {
    client: ConnectionManager,
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis");

        Ok(Self { client: manager })
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get(&self, key: CacheKey<'_>) -> CacheResult<Option<String>> {
        let redis_key = key.namespaced();
        let mut conn = self.client.clone();

        let value = conn
            .get::<_, Option<String>>(&redis_key)
            .await
            .map_err(|e| CacheError::OperationError(format!("GET {}: {}", redis_key, e)))?;

        match &value {
            Some(_) => debug!("Cache HIT: {}", redis_key),
            None => debug!("Cache MISS: {}", redis_key),
        }

        Ok(value)
    }

    async fn put(&self, key: CacheKey<'_>, value: &str, ttl: Duration) -> CacheResult<()> {
        let redis_key = key.namespaced();
        let mut conn = self.client.clone();
        // SETEX rejects a zero expiry
        let ttl_seconds = ttl.as_secs().max(1);

        conn.set_ex::<_, _, ()>(&redis_key, value, ttl_seconds)
            .await
            .map_err(|e| CacheError::OperationError(format!("SETEX {}: {}", redis_key, e)))?;

        debug!("Cache SET: {} (TTL: {}s)", redis_key, ttl_seconds);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
