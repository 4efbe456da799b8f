//! Cross-origin access for browser front-ends on another host.

use axum::http::{Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Accepts any origin for `GET`, `POST` and `OPTIONS` with the `Content-Type`
/// and `Authorization` headers.
///
/// The request origin is echoed back rather than answered with `*`, so
/// credentialed requests are allowed too.
pub fn layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
