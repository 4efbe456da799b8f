//! Handler for link shortening endpoint.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates (or reuses) a short URL for a long URL.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// { "original_url": "https://example.com/some/long/path" }
/// ```
///
/// # Response
///
/// ```json
/// { "short_url": "http://url-shortener-main/api/aB3dE9", "v": 2 }
/// ```
///
/// `v` is `1` when the code was served from the url cache, `2` when newly created.
///
/// # Errors
///
/// Returns 400 Bad Request if the body is malformed or `original_url` is empty.
/// Returns 503 Service Unavailable if the registry cannot be reached.
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<Json<ShortenResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let outcome = state.shortener.shorten(&payload.original_url).await?;

    Ok(Json(outcome.into()))
}
