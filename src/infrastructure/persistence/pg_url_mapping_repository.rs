//! PostgreSQL implementation of the code registry.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;
use tracing::warn;

use crate::domain::entities::{NewUrlMapping, ShortCode, UrlMapping};
use crate::domain::repositories::UrlMappingRepository;
use crate::error::AppError;

/// PostgreSQL registry for url mappings.
///
/// Every call checks a connection out of the shared pool, so concurrent
/// requests never share a session. Uniqueness of `short_code` is enforced by
/// the `urls_short_code_key` constraint.
pub struct PgUrlMappingRepository {
    pool: Arc<PgPool>,
}

impl PgUrlMappingRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct UrlMappingRow {
    id: i64,
    original_url: String,
    short_code: String,
    created_at: DateTime<Utc>,
}

impl UrlMappingRow {
    fn into_entity(self) -> Option<UrlMapping> {
        let Some(short_code) = ShortCode::parse(&self.short_code) else {
            warn!("Skipping row {} with malformed short code", self.id);
            return None;
        };

        Some(UrlMapping::new(
            self.id,
            self.original_url,
            short_code,
            self.created_at,
        ))
    }
}

#[async_trait]
impl UrlMappingRepository for PgUrlMappingRepository {
    async fn insert(&self, new_mapping: NewUrlMapping) -> Result<i64, AppError> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO urls (original_url, short_code) VALUES ($1, $2) RETURNING id",
        )
        .bind(&new_mapping.original_url)
        .bind(new_mapping.short_code.as_str())
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(id)
    }

    async fn exists(&self, short_code: &ShortCode) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM urls WHERE short_code = $1)",
        )
        .bind(short_code.as_str())
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(exists)
    }

    async fn lookup(&self, short_code: &ShortCode) -> Result<Option<String>, AppError> {
        let url = sqlx::query_scalar::<_, String>(
            "SELECT original_url FROM urls WHERE short_code = $1",
        )
        .bind(short_code.as_str())
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(url)
    }

    async fn find_by_code(&self, short_code: &ShortCode) -> Result<Option<UrlMapping>, AppError> {
        let row = sqlx::query_as::<_, UrlMappingRow>(
            r#"
            SELECT id, original_url, short_code, created_at
            FROM urls
            WHERE short_code = $1
            "#,
        )
        .bind(short_code.as_str())
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.and_then(UrlMappingRow::into_entity))
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM urls")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
