//! Banner, health, metrics and response headers.

use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::support::{assert_status, TestApp};

#[tokio::test]
async fn root_serves_banner() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let (status, _, body) = app.request(Method::GET, "/", None).await?;
    assert_status(status, StatusCode::OK, "root");
    assert_eq!(&body[..], b"World Wise Scholar Server is cooking...!");
    Ok(())
}

#[tokio::test]
async fn health_reports_ok() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let (status, body) = app.json(Method::GET, "/health", None).await?;
    assert_status(status, StatusCode::OK, "health");
    assert_eq!(body["status"], json!("ok"));
    Ok(())
}

#[tokio::test]
async fn metrics_are_exposed() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    app.request(Method::GET, "/api/course", None).await?;

    let (status, _, body) = app.request(Method::GET, "/metrics", None).await?;
    assert_status(status, StatusCode::OK, "metrics");
    let text = String::from_utf8_lossy(&body);
    assert!(text.contains("wws_http_requests_total"));
    Ok(())
}

#[tokio::test]
async fn responses_carry_standard_headers() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let (_, headers, _) = app.request(Method::GET, "/api/course", None).await?;

    assert_eq!(
        headers.get("x-content-type-options").and_then(|v| v.to_str().ok()),
        Some("nosniff")
    );
    assert!(headers.contains_key("x-request-id"));
    assert!(!headers.contains_key("strict-transport-security"));
    Ok(())
}

#[tokio::test]
async fn unknown_route_is_not_found() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let (status, _, _) = app.request(Method::GET, "/api/unknown", None).await?;
    assert_status(status, StatusCode::NOT_FOUND, "unknown route");

    let (_, _, body) = app.request(Method::GET, "/metrics", None).await?;
    let text = String::from_utf8_lossy(&body);
    assert!(text.contains(r#"path="unmatched""#));
    assert!(!text.contains("/api/unknown"));
    Ok(())
}
