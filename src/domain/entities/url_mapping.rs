//! Url mapping entity representing one registry row.

use chrono::{DateTime, Utc};

use super::ShortCode;

/// A persisted mapping between a short code and the URL it stands for.
///
/// Rows are append-only: created once at shorten time, never updated or deleted.
#[derive(Debug, Clone)]
pub struct UrlMapping {
    pub id: i64,
    pub original_url: String,
    pub short_code: ShortCode,
    pub created_at: DateTime<Utc>,
}

impl UrlMapping {
    /// Creates a new UrlMapping instance.
    pub fn new(
        id: i64,
        original_url: String,
        short_code: ShortCode,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            original_url,
            short_code,
            created_at,
        }
    }
}

/// Input data for inserting a mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUrlMapping {
    pub original_url: String,
    pub short_code: ShortCode,
}
