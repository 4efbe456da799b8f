mod common;

use axum_test::TestServer;
use snaplink::api::routes::public_routes;

#[tokio::test]
async fn test_health_endpoint_success() {
    let (state, _registry, _cache) = common::create_test_state();
    let server = TestServer::new(public_routes().with_state(state)).unwrap();

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert_eq!(json["checks"]["cache"]["status"], "ok");
    assert!(json.get("version").is_some());
}

#[tokio::test]
async fn test_health_endpoint_degraded() {
    let (state, registry, _cache) = common::create_test_state();
    registry.set_down(true);
    let server = TestServer::new(public_routes().with_state(state)).unwrap();

    let response = server.get("/health").await;

    response.assert_status(axum::http::StatusCode::SERVICE_UNAVAILABLE);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["database"]["status"], "error");
    assert_eq!(json["checks"]["cache"]["status"], "ok");
}
