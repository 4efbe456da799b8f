//! DTOs for link shortening endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::{ShortenOutcome, ShortenTag};

/// Request to shorten a single URL.
///
/// The URL is stored verbatim; no format validation beyond non-emptiness.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    #[validate(length(min = 1, message = "original_url must not be empty"))]
    pub original_url: String,
}

/// Shorten result.
///
/// `v` is `1` when the code came from the cache and `2` when it was newly created.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub short_url: String,
    pub v: ShortenTag,
}

impl From<ShortenOutcome> for ShortenResponse {
    fn from(outcome: ShortenOutcome) -> Self {
        Self {
            short_url: outcome.short_url,
            v: outcome.tag,
        }
    }
}
