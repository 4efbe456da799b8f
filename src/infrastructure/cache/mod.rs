//! Resolution cache.
//!
//! Provides a [`CacheService`] trait with two implementations:
//! - [`RedisCache`] - Production Redis-backed cache
//! - [`MemoryCache`] - Bounded in-process moka cache for single-node runs and tests

mod memory_cache;
mod redis_cache;
mod service;

pub use memory_cache::{DEFAULT_MAX_CAPACITY, MemoryCache};
pub use redis_cache::RedisCache;
pub use service::{CacheError, CacheKey, CacheResult, CacheService};
