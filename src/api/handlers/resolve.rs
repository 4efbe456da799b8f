//! Handler for short code resolution.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::resolve::ResolveResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Resolves a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{short_code}`
///
/// # Request Flow
///
/// 1. Check the code cache
/// 2. On miss, query the registry
/// 3. On registry hit, repopulate the code cache
///
/// # Response
///
/// ```json
/// { "original_url": "https://example.com/some/long/path", "version": 2 }
/// ```
///
/// `version` is `2` for a cache hit and `1` for a registry fallback.
///
/// # Errors
///
/// Returns 404 Not Found if the code is absent from both cache and registry.
pub async fn resolve_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ResolveResponse>, AppError> {
    let outcome = state.shortener.resolve(&short_code).await?;

    Ok(Json(outcome.into()))
}
