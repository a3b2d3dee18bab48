mod common;

use axum::http::{header, StatusCode};
use common::{TestApp, TEST_PASSWORD};
use org_service::config::Environment;

#[tokio::test]
async fn test_root_describes_the_service() {
    let app = TestApp::spawn().await;
    let res = app.get("/").await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], "Multi-Tenant Organization Management API");
    assert_eq!(res.body["version"], "test");
    assert_eq!(res.body["docs"], "/docs");
    assert_eq!(res.body["status"], "running");
}

#[tokio::test]
async fn test_health_check_reports_storage() {
    let app = TestApp::spawn().await;
    let res = app.get("/health").await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["status"], "healthy");
    assert_eq!(res.body["database"], "connected");
    assert_eq!(res.body["version"], "test");
}

#[tokio::test]
async fn test_metrics_endpoint_serves_text() {
    let app = TestApp::spawn().await;
    app.create_org("acme", "a@acme.com", TEST_PASSWORD).await;

    let res = app.get("/metrics").await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res
        .headers
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
}

#[tokio::test]
async fn test_responses_carry_request_id_and_security_headers() {
    let app = TestApp::spawn().await;
    let res = app.get("/org/list").await;

    assert!(res.headers.contains_key("x-request-id"));
    assert_eq!(res.headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(res.headers.get("x-frame-options").unwrap(), "DENY");
}

#[tokio::test]
async fn test_openapi_document_is_published() {
    let app = TestApp::spawn().await;
    let res = app.get("/.well-known/openapi.json").await;

    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body["paths"]["/org/create"].is_object());
    assert!(res.body["paths"]["/admin/login"].is_object());
    assert!(res.body["components"]["securitySchemes"]["bearer_auth"].is_object());
}

#[tokio::test]
async fn test_swagger_ui_is_dev_only() {
    let app = TestApp::spawn_with(|config| {
        config.environment = Environment::Prod;
        config.security.allowed_origins = vec!["https://admin.example.com".to_string()];
    })
    .await;

    assert_eq!(app.get("/docs/").await.status, StatusCode::NOT_FOUND);
    assert_eq!(
        app.get("/.well-known/openapi.json").await.status,
        StatusCode::OK
    );
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = TestApp::spawn().await;

    for path in ["/nope", "/org/nope", "/admin/nope"] {
        let res = app.get(path).await;
        assert_eq!(res.status, StatusCode::NOT_FOUND, "{}", path);
        assert!(!res.headers.contains_key(header::WWW_AUTHENTICATE), "{}", path);
    }
}
