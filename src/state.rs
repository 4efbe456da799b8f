//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{ShortenerService, ShortenerSettings};
use crate::domain::repositories::UrlMappingRepository;
use crate::infrastructure::cache::CacheService;

/// Cloneable handle to the registry, cache and service.
///
/// The registry wraps a connection pool and the cache a multiplexed client,
/// so each request checks out its own connection.
#[derive(Clone)]
pub struct AppState {
    pub shortener: Arc<ShortenerService>,
    pub registry: Arc<dyn UrlMappingRepository>,
    pub cache: Arc<dyn CacheService>,
}

impl AppState {
    pub fn new(
        registry: Arc<dyn UrlMappingRepository>,
        cache: Arc<dyn CacheService>,
        settings: ShortenerSettings,
    ) -> Self {
        let shortener = Arc::new(ShortenerService::new(
            registry.clone(),
            cache.clone(),
            settings,
        ));

        Self {
            shortener,
            registry,
            cache,
        }
    }
}
