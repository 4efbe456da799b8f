//! Repository trait for the code registry.

use crate::domain::entities::{NewUrlMapping, ShortCode, UrlMapping};
use crate::error::AppError;
use async_trait::async_trait;

/// Durable, append-only store of `short_code -> original_url` mappings.
///
/// The store is authoritative and enforces short code uniqueness atomically.
/// `original_url` carries no uniqueness constraint.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlMappingRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlMappingRepository: Send + Sync {
    /// Persists a new mapping and returns its surrogate id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short code already exists. The
    /// check is atomic, so concurrent inserts of the same code have exactly
    /// one winner.
    ///
    /// Returns [`AppError::Unavailable`] or [`AppError::Internal`] on database errors.
    async fn insert(&self, new_mapping: NewUrlMapping) -> Result<i64, AppError>;

    /// Returns whether a short code is already taken.
    async fn exists(&self, short_code: &ShortCode) -> Result<bool, AppError>;

    /// Returns the original URL for a short code, or `Ok(None)` if absent.
    async fn lookup(&self, short_code: &ShortCode) -> Result<Option<String>, AppError>;

    /// Returns the full row for a short code.
    async fn find_by_code(&self, short_code: &ShortCode) -> Result<Option<UrlMapping>, AppError>;

    /// Counts all mappings.
    async fn count(&self) -> Result<i64, AppError>;

    /// Verifies the store is reachable.
    async fn ping(&self) -> Result<(), AppError>;
}
