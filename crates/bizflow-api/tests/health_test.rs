//! Integration tests for the health check endpoint.

mod common;

use axum::http::StatusCode;

#[tokio::test]
async fn test_health_reports_core_wiring() {
    let app = common::build_test_app(&[], vec![]);

    let (status, json) = common::get_json(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(json["subscriptions"], 2);
    assert_eq!(json["max_cascade_depth"], 16);
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let app = common::build_test_app(&[], vec![]);

    let (status, _) = common::get_json(app, "/api/v1/nowhere").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
