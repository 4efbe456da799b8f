//! Shorten and resolve workflows.
//!
//! The registry is the source of truth and the cache is a best-effort
//! accelerator in front of it (cache-aside):
//!
//! ```text
//! shorten: cache[url]? ── hit ──▶ cached code (v=1)
//!                     └─ miss ─▶ generate ─▶ exists? ─▶ insert ─▶ cache[url], cache[code] ─▶ new code (v=2)
//!                                   ▲___________|__________|
//!                                      collision / conflict
//!
//! resolve: cache[code]? ── hit ──▶ url (version=2)
//!                       └─ miss ─▶ registry ── found ─▶ cache[code] ─▶ url (version=1)
//!                                            └─ absent ─▶ 404
//! ```

use std::sync::Arc;
use std::time::Duration;

use serde::{Serialize, Serializer};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::entities::{NewUrlMapping, ShortCode};
use crate::domain::repositories::UrlMappingRepository;
use crate::error::AppError;
use crate::infrastructure::cache::{CacheKey, CacheService};
use crate::utils::code_generator::generate_code;

/// Tunables for [`ShortenerService`].
#[derive(Debug, Clone)]
pub struct ShortenerSettings {
    /// Prefix joined with the code to build `short_url`.
    pub base_url: String,
    /// Lifetime of every cache entry written by the service.
    pub cache_ttl: Duration,
    /// Upper bound on candidate draws (collisions plus insert conflicts) per shorten.
    pub max_attempts: usize,
}

impl Default for ShortenerSettings {
    fn default() -> Self {
        Self {
            base_url: "http://url-shortener-main/api".to_string(),
            cache_ttl: Duration::from_secs(3600),
            max_attempts: 10,
        }
    }
}

/// Marker returned by shorten. Serialized as `v`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortenTag {
    /// Code came from the url cache.
    CacheHit,
    /// Code was generated and persisted by this call.
    Created,
}

impl ShortenTag {
    pub fn as_u8(self) -> u8 {
        match self {
            ShortenTag::CacheHit => 1,
            ShortenTag::Created => 2,
        }
    }
}

impl Serialize for ShortenTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

/// Marker returned by resolve. Serialized as `version`.
///
/// The numbering is independent of [`ShortenTag`]: here 2 means cache hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveTag {
    /// Url came from the registry after a cache miss.
    Registry,
    /// Url came from the code cache.
    CacheHit,
}

impl ResolveTag {
    pub fn as_u8(self) -> u8 {
        match self {
            ResolveTag::Registry => 1,
            ResolveTag::CacheHit => 2,
        }
    }
}

impl Serialize for ResolveTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShortenOutcome {
    pub short_code: ShortCode,
    pub short_url: String,
    pub tag: ShortenTag,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolveOutcome {
    pub original_url: String,
    pub tag: ResolveTag,
}

/// Service coordinating the code registry and the resolution cache.
pub struct ShortenerService {
    registry: Arc<dyn UrlMappingRepository>,
    cache: Arc<dyn CacheService>,
    settings: ShortenerSettings,
}

impl ShortenerService {
    /// Creates a new shortener service.
    pub fn new(
        registry: Arc<dyn UrlMappingRepository>,
        cache: Arc<dyn CacheService>,
        settings: ShortenerSettings,
    ) -> Self {
        Self {
            registry,
            cache,
            settings,
        }
    }

    /// Returns a short code for `original_url`, reusing a cached one if present.
    ///
    /// A url cache hit is trusted without consulting the registry: codes are
    /// never reassigned, so a cached code always still points at this url.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the url is empty or contains NUL.
    /// Returns [`AppError::Internal`] if no free code was found within
    /// `max_attempts` draws, and store errors from the registry.
    pub async fn shorten(&self, original_url: &str) -> Result<ShortenOutcome, AppError> {
        validate_original_url(original_url)?;

        if let Some(short_code) = self.cached_code_for(original_url).await {
            return Ok(self.outcome(short_code, ShortenTag::CacheHit));
        }

        let short_code = self.allocate(original_url).await?;

        self.populate(CacheKey::Url(original_url), short_code.as_str())
            .await;
        self.populate(CacheKey::Code(short_code.as_str()), original_url)
            .await;

        Ok(self.outcome(short_code, ShortenTag::Created))
    }

    /// Resolves a short code to its original url.
    ///
    /// A registry hit repopulates the code cache. A registry miss is not cached,
    /// so repeated lookups of an unknown code each reach the registry.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is malformed or absent from
    /// both cache and registry.
    pub async fn resolve(&self, raw_code: &str) -> Result<ResolveOutcome, AppError> {
        let Some(short_code) = ShortCode::parse(raw_code) else {
            debug!("Rejecting malformed short code without lookup");
            return Err(not_found(raw_code));
        };

        match self.cache.get_by_code(short_code.as_str()).await {
            Ok(Some(original_url)) => {
                return Ok(ResolveOutcome {
                    original_url,
                    tag: ResolveTag::CacheHit,
                });
            }
            Ok(None) => {}
            Err(e) => warn!("Cache read failed, falling back to registry: {}", e),
        }

        let original_url = self
            .registry
            .lookup(&short_code)
            .await?
            .ok_or_else(|| not_found(short_code.as_str()))?;

        self.populate(CacheKey::Code(short_code.as_str()), &original_url)
            .await;

        Ok(ResolveOutcome {
            original_url,
            tag: ResolveTag::Registry,
        })
    }

    /// Builds the public short url for a code.
    pub fn short_url(&self, short_code: &ShortCode) -> String {
        format!(
            "{}/{}",
            self.settings.base_url.trim_end_matches('/'),
            short_code
        )
    }

    fn outcome(&self, short_code: ShortCode, tag: ShortenTag) -> ShortenOutcome {
        ShortenOutcome {
            short_url: self.short_url(&short_code),
            short_code,
            tag,
        }
    }

    /// Looks up the url cache; any failure or malformed entry counts as a miss.
    async fn cached_code_for(&self, original_url: &str) -> Option<ShortCode> {
        match self.cache.get_by_url(original_url).await {
            Ok(Some(cached)) => {
                let parsed = ShortCode::parse(&cached);
                if parsed.is_none() {
                    warn!("Ignoring malformed cached short code '{}'", cached);
                }
                parsed
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Cache read failed, allocating a new code: {}", e);
                None
            }
        }
    }

    /// Draws candidates until one is persisted.
    ///
    /// The `exists` pre-check avoids most wasted inserts; the registry's
    /// unique constraint settles races between concurrent requests, and the
    /// loser draws again.
    async fn allocate(&self, original_url: &str) -> Result<ShortCode, AppError> {
        let max_attempts = self.settings.max_attempts;

        for attempt in 1..=max_attempts {
            let candidate = generate_code();

            if self.registry.exists(&candidate).await? {
                debug!(attempt, "Short code {} already taken", candidate);
                continue;
            }

            let new_mapping = NewUrlMapping {
                original_url: original_url.to_string(),
                short_code: candidate.clone(),
            };

            match self.registry.insert(new_mapping).await {
                Ok(id) => {
                    info!(id, attempt, "Created short code {}", candidate);
                    return Ok(candidate);
                }
                Err(AppError::Conflict { .. }) => {
                    warn!(
                        attempt,
                        "Short code {} was taken concurrently, drawing again", candidate
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::internal(
            "Failed to generate unique code",
            json!({ "reason": "Too many collisions", "attempts": max_attempts }),
        ))
    }

    /// Writes a cache entry; failures are logged and swallowed.
    async fn populate(&self, key: CacheKey<'_>, value: &str) {
        if let Err(e) = self.cache.put(key, value, self.settings.cache_ttl).await {
            warn!("Failed to cache {}: {}", key.namespaced(), e);
        }
    }
}

fn validate_original_url(original_url: &str) -> Result<(), AppError> {
    if original_url.is_empty() {
        return Err(AppError::bad_request(
            "original_url must not be empty",
            json!({ "field": "original_url" }),
        ));
    }

    if original_url.contains('\0') {
        return Err(AppError::bad_request(
            "original_url must not contain NUL characters",
            json!({ "field": "original_url" }),
        ));
    }

    Ok(())
}

fn not_found(short_code: &str) -> AppError {
    AppError::not_found("URL not found", json!({ "short_code": short_code }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockUrlMappingRepository;
    use crate::infrastructure::cache::{CacheError, CacheResult, MemoryCache};
    use async_trait::async_trait;

    struct FailingCache;

    #[async_trait]
    impl CacheService for FailingCache {
        async fn get(&self, _key: CacheKey<'_>) -> CacheResult<Option<String>> {
            Err(CacheError::ConnectionError("down".to_string()))
        }

        async fn put(&self, _key: CacheKey<'_>, _value: &str, _ttl: Duration) -> CacheResult<()> {
            Err(CacheError::ConnectionError("down".to_string()))
        }

        async fn health_check(&self) -> bool {
            false
        }
    }

    fn service_with(
        registry: MockUrlMappingRepository,
        cache: Arc<dyn CacheService>,
    ) -> ShortenerService {
        ShortenerService::new(Arc::new(registry), cache, ShortenerSettings::default())
    }

    #[tokio::test]
    async fn test_shorten_creates_new_code_on_cache_miss() {
        let mut registry = MockUrlMappingRepository::new();
        registry.expect_exists().times(1).returning(|_| Ok(false));
        registry
            .expect_insert()
            .withf(|m| m.original_url == "https://example.com")
            .times(1)
            .returning(|_| Ok(1));

        let cache = Arc::new(MemoryCache::new());
        let service = service_with(registry, cache.clone());

        let outcome = service.shorten("https://example.com").await.unwrap();

        assert_eq!(outcome.tag, ShortenTag::Created);
        assert_eq!(
            outcome.short_url,
            format!("http://url-shortener-main/api/{}", outcome.short_code)
        );
        assert_eq!(
            cache.get_by_url("https://example.com").await.unwrap(),
            Some(outcome.short_code.to_string())
        );
        assert_eq!(
            cache.get_by_code(outcome.short_code.as_str()).await.unwrap(),
            Some("https://example.com".to_string())
        );
    }

    #[tokio::test]
    async fn test_shorten_cache_hit_skips_registry() {
        let mut registry = MockUrlMappingRepository::new();
        registry.expect_exists().times(0);
        registry.expect_insert().times(0);

        let cache = Arc::new(MemoryCache::new());
        cache
            .put(
                CacheKey::Url("https://example.com"),
                "abc123",
                Duration::from_secs(60),
            )
            .await
            .unwrap();

        let service = service_with(registry, cache);
        let outcome = service.shorten("https://example.com").await.unwrap();

        assert_eq!(outcome.tag, ShortenTag::CacheHit);
        assert_eq!(outcome.short_code.as_str(), "abc123");
        assert_eq!(outcome.short_url, "http://url-shortener-main/api/abc123");
    }

    #[tokio::test]
    async fn test_shorten_ignores_malformed_cached_code() {
        let mut registry = MockUrlMappingRepository::new();
        registry.expect_exists().times(1).returning(|_| Ok(false));
        registry.expect_insert().times(1).returning(|_| Ok(7));

        let cache = Arc::new(MemoryCache::new());
        cache
            .put(
                CacheKey::Url("https://example.com"),
                "not a code",
                Duration::from_secs(60),
            )
            .await
            .unwrap();

        let service = service_with(registry, cache);
        let outcome = service.shorten("https://example.com").await.unwrap();

        assert_eq!(outcome.tag, ShortenTag::Created);
    }

    #[tokio::test]
    async fn test_shorten_redraws_on_collision() {
        let mut registry = MockUrlMappingRepository::new();
        let mut seq = mockall::Sequence::new();
        registry
            .expect_exists()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_| Ok(true));
        registry
            .expect_exists()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(false));
        registry.expect_insert().times(1).returning(|_| Ok(3));

        let service = service_with(registry, Arc::new(MemoryCache::new()));
        let outcome = service.shorten("https://example.com").await.unwrap();

        assert_eq!(outcome.tag, ShortenTag::Created);
    }

    #[tokio::test]
    async fn test_shorten_retries_after_insert_conflict() {
        let mut registry = MockUrlMappingRepository::new();
        registry.expect_exists().times(2).returning(|_| Ok(false));

        let mut seq = mockall::Sequence::new();
        registry
            .expect_insert()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Err(AppError::conflict(
                    "Unique constraint violation",
                    json!({ "constraint": "urls_short_code_key" }),
                ))
            });
        registry
            .expect_insert()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(42));

        let service = service_with(registry, Arc::new(MemoryCache::new()));
        let result = service.shorten("https://example.com").await;

        assert!(result.is_ok());
        assert_eq!(result.unwrap().tag, ShortenTag::Created);
    }

    #[tokio::test]
    async fn test_shorten_gives_up_after_max_attempts() {
        let mut registry = MockUrlMappingRepository::new();
        registry.expect_exists().times(10).returning(|_| Ok(true));
        registry.expect_insert().times(0);

        let service = service_with(registry, Arc::new(MemoryCache::new()));
        let result = service.shorten("https://example.com").await;

        assert!(matches!(result.unwrap_err(), AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_shorten_propagates_store_errors() {
        let mut registry = MockUrlMappingRepository::new();
        registry
            .expect_exists()
            .times(1)
            .returning(|_| Err(AppError::unavailable("Database unavailable", json!({}))));

        let service = service_with(registry, Arc::new(MemoryCache::new()));
        let result = service.shorten("https://example.com").await;

        assert!(matches!(result.unwrap_err(), AppError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn test_shorten_succeeds_when_cache_is_down() {
        let mut registry = MockUrlMappingRepository::new();
        registry.expect_exists().times(1).returning(|_| Ok(false));
        registry.expect_insert().times(1).returning(|_| Ok(1));

        let service = service_with(registry, Arc::new(FailingCache));
        let outcome = service.shorten("https://example.com").await.unwrap();

        assert_eq!(outcome.tag, ShortenTag::Created);
    }

    #[tokio::test]
    async fn test_shorten_rejects_empty_and_nul() {
        let mut registry = MockUrlMappingRepository::new();
        registry.expect_exists().times(0);

        let service = service_with(registry, Arc::new(MemoryCache::new()));

        assert!(matches!(
            service.shorten("").await.unwrap_err(),
            AppError::Validation { .. }
        ));
        assert!(matches!(
            service.shorten("https://a\0b").await.unwrap_err(),
            AppError::Validation { .. }
        ));
    }

    #[tokio::test]
    async fn test_resolve_cache_hit_skips_registry() {
        let mut registry = MockUrlMappingRepository::new();
        registry.expect_lookup().times(0);

        let cache = Arc::new(MemoryCache::new());
        cache
            .put(
                CacheKey::Code("abc123"),
                "https://example.com",
                Duration::from_secs(60),
            )
            .await
            .unwrap();

        let service = service_with(registry, cache);
        let outcome = service.resolve("abc123").await.unwrap();

        assert_eq!(outcome.original_url, "https://example.com");
        assert_eq!(outcome.tag, ResolveTag::CacheHit);
    }

    #[tokio::test]
    async fn test_resolve_falls_back_to_registry_and_repopulates() {
        let mut registry = MockUrlMappingRepository::new();
        registry
            .expect_lookup()
            .withf(|code| code.as_str() == "abc123")
            .times(1)
            .returning(|_| Ok(Some("https://example.com".to_string())));

        let cache = Arc::new(MemoryCache::new());
        let service = service_with(registry, cache.clone());

        let first = service.resolve("abc123").await.unwrap();
        assert_eq!(first.tag, ResolveTag::Registry);

        let second = service.resolve("abc123").await.unwrap();
        assert_eq!(second.tag, ResolveTag::CacheHit);
        assert_eq!(second.original_url, "https://example.com");
    }

    #[tokio::test]
    async fn test_resolve_not_found_is_not_cached() {
        let mut registry = MockUrlMappingRepository::new();
        registry.expect_lookup().times(2).returning(|_| Ok(None));

        let cache = Arc::new(MemoryCache::new());
        let service = service_with(registry, cache.clone());

        for _ in 0..2 {
            let err = service.resolve("zzz999").await.unwrap_err();
            assert!(matches!(err, AppError::NotFound { .. }));
        }
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_resolve_malformed_code_skips_lookup() {
        let mut registry = MockUrlMappingRepository::new();
        registry.expect_lookup().times(0);

        let service = service_with(registry, Arc::new(MemoryCache::new()));

        for raw in ["abc", "abc-12", "toolong1"] {
            let err = service.resolve(raw).await.unwrap_err();
            assert!(matches!(err, AppError::NotFound { .. }));
        }
    }

    #[tokio::test]
    async fn test_resolve_with_cache_down_uses_registry() {
        let mut registry = MockUrlMappingRepository::new();
        registry
            .expect_lookup()
            .times(1)
            .returning(|_| Ok(Some("https://example.com".to_string())));

        let service = service_with(registry, Arc::new(FailingCache));
        let outcome = service.resolve("abc123").await.unwrap();

        assert_eq!(outcome.tag, ResolveTag::Registry);
    }

    #[test]
    fn test_tags_serialize_as_numbers() {
        assert_eq!(serde_json::to_value(ShortenTag::CacheHit).unwrap(), 1);
        assert_eq!(serde_json::to_value(ShortenTag::Created).unwrap(), 2);
        assert_eq!(serde_json::to_value(ResolveTag::Registry).unwrap(), 1);
        assert_eq!(serde_json::to_value(ResolveTag::CacheHit).unwrap(), 2);
    }

    #[test]
    fn test_short_url_trims_trailing_slash() {
        let service = ShortenerService::new(
            Arc::new(MockUrlMappingRepository::new()),
            Arc::new(MemoryCache::new()),
            ShortenerSettings {
                base_url: "https://s.example.com/".to_string(),
                ..ShortenerSettings::default()
            },
        );

        let code = ShortCode::parse("abc123").unwrap();
        assert_eq!(service.short_url(&code), "https://s.example.com/abc123");
    }
}
