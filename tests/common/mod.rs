#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use snaplink::AppState;
use snaplink::application::services::ShortenerSettings;
use snaplink::domain::entities::{NewUrlMapping, ShortCode, UrlMapping};
use snaplink::domain::repositories::UrlMappingRepository;
use snaplink::error::AppError;
use snaplink::infrastructure::cache::MemoryCache;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};

/// Registry double with the same uniqueness semantics as the `urls` table.
#[derive(Default)]
pub struct InMemoryRegistry {
    rows: Mutex<HashMap<String, UrlMapping>>,
    next_id: AtomicI64,
    lookups: AtomicUsize,
    down: AtomicBool,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every call fail as if the database were unreachable.
    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    /// Number of `lookup` calls served so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Inserts a row directly, bypassing the service.
    pub fn seed(&self, code: &str, url: &str) {
        let short_code = ShortCode::parse(code).expect("seed code must be valid");
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.rows.lock().unwrap().insert(
            code.to_string(),
            UrlMapping::new(id, url.to_string(), short_code, Utc::now()),
        );
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    fn check_up(&self) -> Result<(), AppError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(AppError::unavailable("Database unavailable", json!({})));
        }
        Ok(())
    }
}

#[async_trait]
impl UrlMappingRepository for InMemoryRegistry {
    async fn insert(&self, new_mapping: NewUrlMapping) -> Result<i64, AppError> {
        self.check_up()?;
        let mut rows = self.rows.lock().unwrap();
        let key = new_mapping.short_code.as_str().to_string();

        if rows.contains_key(&key) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "urls_short_code_key" }),
            ));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        rows.insert(
            key,
            UrlMapping::new(
                id,
                new_mapping.original_url,
                new_mapping.short_code,
                Utc::now(),
            ),
        );
        Ok(id)
    }

    async fn exists(&self, short_code: &ShortCode) -> Result<bool, AppError> {
        self.check_up()?;
        Ok(self.rows.lock().unwrap().contains_key(short_code.as_str()))
    }

    async fn lookup(&self, short_code: &ShortCode) -> Result<Option<String>, AppError> {
        self.check_up()?;
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .rows
            .lock()
            .unwrap()
            .get(short_code.as_str())
            .map(|m| m.original_url.clone()))
    }

    async fn find_by_code(&self, short_code: &ShortCode) -> Result<Option<UrlMapping>, AppError> {
        self.check_up()?;
        Ok(self.rows.lock().unwrap().get(short_code.as_str()).cloned())
    }

    async fn count(&self) -> Result<i64, AppError> {
        self.check_up()?;
        Ok(self.rows.lock().unwrap().len() as i64)
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.check_up()
    }
}

pub fn create_test_state() -> (AppState, Arc<InMemoryRegistry>, Arc<MemoryCache>) {
    create_test_state_with(ShortenerSettings::default())
}

pub fn create_test_state_with(
    settings: ShortenerSettings,
) -> (AppState, Arc<InMemoryRegistry>, Arc<MemoryCache>) {
    let registry = Arc::new(InMemoryRegistry::new());
    let cache = Arc::new(MemoryCache::new());

    let state = AppState::new(registry.clone(), cache.clone(), settings);

    (state, registry, cache)
}
