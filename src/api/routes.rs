//! API route configuration.

use crate::api::handlers::{health_handler, resolve_handler, shorten_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// All public routes.
///
/// # Endpoints
///
/// - `POST /shorten`        - Create or reuse a short code
/// - `GET  /health`         - Database and cache status
/// - `GET  /{short_code}`   - Resolve a short code
///
/// `/health` is a static segment and wins over `/{short_code}`; the code
/// generator never issues `health`.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/health", get(health_handler))
        .route("/{short_code}", get(resolve_handler))
}
