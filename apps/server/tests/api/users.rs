//! User registration, role lookups and ambassador routes.

use axum::http::{Method, StatusCode};
use mongodb::bson::doc;
use serde_json::json;
use wws_server::config::CollectionConfig;

use crate::support::{assert_status, ids, is_object_id_hex, TestApp};

async fn app_with_users() -> anyhow::Result<TestApp> {
    let app = TestApp::new().await?;
    app.seed(
        "users",
        vec![
            doc! { "_id": "u1", "email": "student@example.com", "role": "user" },
            doc! { "_id": "u2", "email": "admin@example.com", "role": "admin" },
            doc! { "_id": "u3", "email": "amb@example.com", "role": "ambassador", "status": "pending" },
        ],
    )
    .await;
    Ok(app)
}

#[tokio::test]
async fn register_creates_user() -> anyhow::Result<()> {
    let app = TestApp::new().await?;

    let (status, body) = app
        .json(
            Method::POST,
            "/post-users",
            Some(json!({ "email": "new@example.com", "name": "New", "role": "user" })),
        )
        .await?;
    assert_status(status, StatusCode::CREATED, "register");
    assert_eq!(body["message"], json!("User added successfully"));
    assert!(is_object_id_hex(&body["userId"]));

    let (_, users) = app.json(Method::GET, "/users", None).await?;
    assert_eq!(users.as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn register_without_email_is_rejected() -> anyhow::Result<()> {
    let app = TestApp::new().await?;

    let (status, body) = app
        .json(Method::POST, "/post-users", Some(json!({ "name": "Nobody" })))
        .await?;
    assert_status(status, StatusCode::BAD_REQUEST, "missing email");
    assert_eq!(
        body,
        json!({ "success": false, "message": "User data or email is missing" })
    );

    let (status, _, _) = app.request_raw(Method::POST, "/post-users", "").await?;
    assert_status(status, StatusCode::BAD_REQUEST, "empty body");
    Ok(())
}

#[tokio::test]
async fn register_duplicate_email_conflicts() -> anyhow::Result<()> {
    let app = app_with_users().await?;

    let (status, body) = app
        .json(
            Method::POST,
            "/post-users",
            Some(json!({ "email": "student@example.com" })),
        )
        .await?;
    assert_status(status, StatusCode::CONFLICT, "duplicate email");
    assert_eq!(body["message"], json!("User already exists"));

    let (_, users) = app.json(Method::GET, "/users", None).await?;
    assert_eq!(users.as_array().map(Vec::len), Some(3));
    Ok(())
}

#[tokio::test]
async fn concurrent_registrations_admit_one() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let body = json!({ "email": "race@example.com" });

    let (first, second) = tokio::join!(
        app.json(Method::POST, "/post-users", Some(body.clone())),
        app.json(Method::POST, "/post-users", Some(body.clone())),
    );
    let mut statuses = vec![first?.0, second?.0];
    statuses.sort();
    assert_eq!(statuses, vec![StatusCode::CREATED, StatusCode::CONFLICT]);
    Ok(())
}

#[tokio::test]
async fn role_lookups() -> anyhow::Result<()> {
    let app = app_with_users().await?;

    let cases = [
        ("/getUser/student@example.com", "user", true),
        ("/getAdmin/student@example.com", "admin", false),
        ("/getAdmin/admin@example.com", "admin", true),
        ("/getAmbassador/amb@example.com", "ambassador", true),
        ("/getAmbassador/admin@example.com", "ambassador", false),
    ];
    for (path, key, expected) in cases {
        let (status, body) = app.json(Method::GET, path, None).await?;
        assert_status(status, StatusCode::OK, path);
        assert_eq!(body, json!({ key: expected }), "{path}");
    }

    let (status, body) = app
        .json(Method::GET, "/getUser/ghost@example.com", None)
        .await?;
    assert_status(status, StatusCode::NOT_FOUND, "unknown email");
    assert_eq!(body["message"], json!("No user found"));
    Ok(())
}

#[tokio::test]
async fn ambassadors_are_listed_and_updated() -> anyhow::Result<()> {
    let app = app_with_users().await?;

    let (status, body) = app.json(Method::GET, "/user/ambassador", None).await?;
    assert_status(status, StatusCode::OK, "list ambassadors");
    assert_eq!(ids(&body), vec!["u3"]);

    let (status, body) = app
        .json(
            Method::PATCH,
            "/user/ambassador/u3",
            Some(json!({ "status": "approved" })),
        )
        .await?;
    assert_status(status, StatusCode::OK, "approve ambassador");
    assert_eq!(
        body,
        json!({ "success": true, "matchedCount": 1, "modifiedCount": 1 })
    );

    let (status, _) = app
        .json(
            Method::PATCH,
            "/user/ambassador/nobody",
            Some(json!({ "status": "approved" })),
        )
        .await?;
    assert_status(status, StatusCode::NOT_FOUND, "unknown ambassador");
    Ok(())
}

#[tokio::test]
async fn nested_users_collection_is_refused() -> anyhow::Result<()> {
    let built = TestApp::new_with_config(|config| {
        config.collections.users = CollectionConfig::nested("users", "data");
    })
    .await;
    let err = built.err().map(|e| format!("{e:#}")).unwrap_or_default();
    assert!(err.contains("collections.users"), "{err}");
    Ok(())
}
