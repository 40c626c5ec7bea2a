//! Collaboration posts and the mail notice they trigger.

use axum::http::{Method, StatusCode};
use serde_json::json;
use wws_server::services::RecordingMailer;

use crate::support::{assert_status, is_object_id_hex, TestApp};

fn post() -> serde_json::Value {
    json!({
        "name": "Rahim",
        "email": "rahim@example.com",
        "message": "Happy to mentor applicants for Germany.",
    })
}

#[tokio::test]
async fn submit_stores_post_and_sends_notice() -> anyhow::Result<()> {
    let app = TestApp::new().await?;

    let (status, body) = app.json(Method::POST, "/collaborate", Some(post())).await?;
    assert_status(status, StatusCode::OK, "submit post");
    assert_eq!(body["message"], json!("Enquiry submitted successfully"));
    assert!(is_object_id_hex(&body["id"]));

    let (_, posts) = app.json(Method::GET, "/collaborate", None).await?;
    assert_eq!(posts.as_array().map(Vec::len), Some(1));
    assert_eq!(posts[0]["name"], json!("Rahim"));

    let sent = app.delivered_mail().await?;
    assert_eq!(sent.len(), 1);
    let mail = &sent[0];
    assert_eq!(mail.to, "team@example.com");
    assert_eq!(mail.subject, "New Post Submitted by User");
    assert!(mail.body.starts_with("Hi Team,"));
    assert!(mail.body.contains("rahim@example.com"));
    assert!(mail.body.contains("Happy to mentor applicants for Germany."));
    assert!(mail.body.ends_with("World Wise Scholar Team\n"));
    Ok(())
}

#[tokio::test]
async fn mail_failure_does_not_fail_the_request() -> anyhow::Result<()> {
    let app = TestApp::with_mailer(RecordingMailer::failing()).await?;

    let (status, _) = app.json(Method::POST, "/collaborate", Some(post())).await?;
    assert_status(status, StatusCode::OK, "submit with broken mailer");

    let (_, posts) = app.json(Method::GET, "/collaborate", None).await?;
    assert_eq!(posts.as_array().map(Vec::len), Some(1));

    assert!(app.delivered_mail().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn rejected_post_sends_nothing() -> anyhow::Result<()> {
    let app = TestApp::new().await?;

    let (status, _, _) = app.request_raw(Method::POST, "/collaborate", "  ").await?;
    assert_status(status, StatusCode::BAD_REQUEST, "empty body");

    assert!(app.delivered_mail().await?.is_empty());
    Ok(())
}
