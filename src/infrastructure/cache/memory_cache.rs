//! In-process cache implementation.

use super::service::{CacheKey, CacheResult, CacheService};
use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Default upper bound on stored entries across both keyspaces.
pub const DEFAULT_MAX_CAPACITY: u64 = 10_000;

#[derive(Clone)]
struct Entry {
    value: String,
    ttl: Duration,
}

/// Gives every entry the TTL it was written with. A rewrite restarts the clock.
struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// A bounded TTL cache living inside the process.
///
/// Used when Redis is not configured or unreachable at startup. Entries are
/// not shared between instances. Once `max_capacity` is reached moka evicts
/// the least valuable entries.
#[derive(Clone)]
pub struct MemoryCache {
    cache: Cache<String, Entry>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_CAPACITY)
    }

    pub fn with_capacity(max_capacity: u64) -> Self {
        debug!("Using in-memory cache (max {} entries)", max_capacity);
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .build();
        Self { cache }
    }

    /// Number of live entries after pending evictions are applied.
    pub async fn len(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get(&self, key: CacheKey<'_>) -> CacheResult<Option<String>> {
        let cache_key = key.namespaced();

        match self.cache.get(&cache_key).await {
            Some(entry) => {
                debug!("Cache HIT: {}", cache_key);
                Ok(Some(entry.value))
            }
            None => {
                debug!("Cache MISS: {}", cache_key);
                Ok(None)
            }
        }
    }

    async fn put(&self, key: CacheKey<'_>, value: &str, ttl: Duration) -> CacheResult<()> {
        let cache_key = key.namespaced();

        // already expired
        if ttl.is_zero() {
            self.cache.invalidate(&cache_key).await;
            return Ok(());
        }

        trace!("Cache SET: {} (ttl {:?})", cache_key, ttl);
        self.cache
            .insert(
                cache_key,
                Entry {
                    value: value.to_string(),
                    ttl,
                },
            )
            .await;
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
