//! DTOs for short code resolution endpoint.

use serde::Serialize;

use crate::application::services::{ResolveOutcome, ResolveTag};

/// Resolution result.
///
/// `version` is `2` for a cache hit and `1` for a registry fallback. The
/// numbering deliberately differs from `v` in the shorten response.
#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub original_url: String,
    pub version: ResolveTag,
}

impl From<ResolveOutcome> for ResolveResponse {
    fn from(outcome: ResolveOutcome) -> Self {
        Self {
            original_url: outcome.original_url,
            version: outcome.tag,
        }
    }
}
