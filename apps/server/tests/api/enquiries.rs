//! "Help from WWS" enquiry routes.

use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::support::{assert_status, is_object_id_hex, TestApp};

async fn submit(app: &TestApp, email: &str, topic: &str) -> anyhow::Result<String> {
    let (status, body) = app
        .json(
            Method::POST,
            "/help-from-wws",
            Some(json!({ "userEmail": email, "topic": topic, "status": "pending" })),
        )
        .await?;
    assert_status(status, StatusCode::OK, "submit enquiry");
    assert_eq!(body["message"], json!("Enquiry submitted successfully"));
    assert!(is_object_id_hex(&body["id"]));
    Ok(body["id"].as_str().unwrap_or_default().to_string())
}

#[tokio::test]
async fn enquiries_are_listed_by_email() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    submit(&app, "a@example.com", "Visa").await?;
    submit(&app, "a@example.com", "Housing").await?;
    submit(&app, "b@example.com", "Funding").await?;

    let (_, all) = app.json(Method::GET, "/help-from-wws", None).await?;
    assert_eq!(all.as_array().map(Vec::len), Some(3));

    let (status, mine) = app
        .json(Method::GET, "/help-from-wws/a@example.com", None)
        .await?;
    assert_status(status, StatusCode::OK, "by email");
    let mut topics: Vec<&str> = mine
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|item| item["topic"].as_str())
        .collect();
    topics.sort();
    assert_eq!(topics, vec!["Housing", "Visa"]);

    // Exact match only
    let (_, none) = app.json(Method::GET, "/help-from-wws/a@example", None).await?;
    assert_eq!(none, json!([]));
    Ok(())
}

#[tokio::test]
async fn status_can_be_changed() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let id = submit(&app, "a@example.com", "Visa").await?;

    let path = format!("/help-from-wws/{id}");
    let (status, body) = app
        .json(Method::PATCH, &path, Some(json!({ "status": "resolved" })))
        .await?;
    assert_status(status, StatusCode::OK, "patch status");
    assert_eq!(
        body,
        json!({ "success": true, "matchedCount": 1, "modifiedCount": 1 })
    );

    let (_, mine) = app
        .json(Method::GET, "/help-from-wws/a@example.com", None)
        .await?;
    assert_eq!(mine[0]["status"], json!("resolved"));

    let (status, body) = app
        .json(Method::PATCH, &path, Some(json!({ "topic": "Other" })))
        .await?;
    assert_status(status, StatusCode::BAD_REQUEST, "missing status");
    assert_eq!(body["message"], json!("status is required"));

    let (status, _) = app
        .json(
            Method::PATCH,
            "/help-from-wws/unknown",
            Some(json!({ "status": "resolved" })),
        )
        .await?;
    assert_status(status, StatusCode::NOT_FOUND, "patch unknown");
    Ok(())
}

#[tokio::test]
async fn enquiries_can_be_deleted() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let id = submit(&app, "a@example.com", "Visa").await?;

    let path = format!("/help-from-wws/{id}");
    let (status, body) = app.json(Method::DELETE, &path, None).await?;
    assert_status(status, StatusCode::OK, "delete enquiry");
    assert_eq!(body, json!({ "success": true, "deletedCount": 1 }));

    let (status, body) = app.json(Method::DELETE, &path, None).await?;
    assert_status(status, StatusCode::NOT_FOUND, "delete twice");
    assert_eq!(
        body,
        json!({ "success": false, "message": "Enquiry not found" })
    );
    Ok(())
}
