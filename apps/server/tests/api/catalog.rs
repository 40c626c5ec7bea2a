//! Catalog routes: list, search, read, create, update and delete.

use axum::http::{Method, StatusCode};
use mongodb::bson::{doc, oid::ObjectId, Document};
use serde_json::json;
use wws_server::config::CollectionConfig;

use crate::support::{assert_status, ids, is_object_id_hex, TestApp};

fn courses() -> Vec<Document> {
    vec![
        doc! { "_id": "c1", "subject": "Computer Science", "destination": "Canada", "studyLevel": "Masters" },
        doc! { "_id": "c2", "subject": "Computer Science", "destination": "UK", "studyLevel": "Bachelors" },
        doc! { "_id": "c3", "subject": "Biology", "destination": "Canada", "studyLevel": "Masters" },
    ]
}

fn events() -> Vec<Document> {
    vec![
        doc! { "_id": "e1", "city": "Dhaka", "month": "June", "destination": "Bangladesh" },
        doc! { "_id": "e2", "city": "Toronto", "month": "May", "destination": "Canada" },
        doc! { "_id": "e3", "city": "Berlin", "month": "October", "destination": "Germany" },
    ]
}

/// The same records stored inside two wrapper documents.
fn nested(records: Vec<Document>) -> Vec<Document> {
    let (first, second) = records.split_at(1);
    vec![
        doc! { "_id": ObjectId::new(), "data": first.to_vec() },
        doc! { "_id": ObjectId::new(), "data": second.to_vec() },
    ]
}

async fn flat_app() -> anyhow::Result<TestApp> {
    let app = TestApp::new().await?;
    app.seed("courses", courses()).await;
    app.seed("events", events()).await;
    Ok(app)
}

async fn nested_app() -> anyhow::Result<TestApp> {
    let app = TestApp::new_with_config(|config| {
        config.collections.courses = CollectionConfig::nested("courses", "data");
        config.collections.events = CollectionConfig::nested("events", "data");
    })
    .await?;
    app.seed("courses", nested(courses())).await;
    app.seed("events", nested(events())).await;
    Ok(app)
}

#[tokio::test]
async fn post_search_requires_every_field() -> anyhow::Result<()> {
    for app in [flat_app().await?, nested_app().await?] {
        let (status, body) = app
            .json(
                Method::POST,
                "/api/search/course",
                Some(json!({ "subject": "Computer", "destination": "Canada" })),
            )
            .await?;

        assert_status(status, StatusCode::OK, "course search");
        assert_eq!(body["success"], json!(true));
        assert_eq!(ids(&body["data"]), vec!["c1"]);
    }
    Ok(())
}

#[tokio::test]
async fn post_search_on_events_matches_any_field() -> anyhow::Result<()> {
    for app in [flat_app().await?, nested_app().await?] {
        let (status, body) = app
            .json(
                Method::POST,
                "/api/search/events",
                Some(json!({ "city": "Dhaka", "month": "May" })),
            )
            .await?;

        assert_status(status, StatusCode::OK, "event search");
        assert_eq!(ids(&body["data"]), vec!["e1", "e2"]);
    }
    Ok(())
}

#[tokio::test]
async fn post_search_without_fields() -> anyhow::Result<()> {
    let app = flat_app().await?;

    let (_, body) = app
        .json(Method::POST, "/api/search/course", Some(json!({})))
        .await?;
    assert_eq!(ids(&body["data"]), vec!["c1", "c2", "c3"]);

    // An empty disjunction matches nothing
    let (_, body) = app
        .json(Method::POST, "/api/search/events", Some(json!({ "city": "" })))
        .await?;
    assert_eq!(body["data"], json!([]));
    Ok(())
}

#[tokio::test]
async fn post_search_with_empty_body() -> anyhow::Result<()> {
    let app = flat_app().await?;

    let (status, _, bytes) = app
        .request_raw(Method::POST, "/api/search/course", "")
        .await?;
    assert_status(status, StatusCode::OK, "course search without body");
    let body: serde_json::Value = serde_json::from_slice(&bytes)?;
    assert_eq!(ids(&body["data"]), vec!["c1", "c2", "c3"]);

    let (status, _, bytes) = app
        .request_raw(Method::POST, "/api/search/events", "  \n")
        .await?;
    assert_status(status, StatusCode::OK, "event search without body");
    let body: serde_json::Value = serde_json::from_slice(&bytes)?;
    assert_eq!(body["data"], json!([]));

    let (status, _, _) = app
        .request_raw(Method::POST, "/api/search/course", "[1]")
        .await?;
    assert_status(status, StatusCode::BAD_REQUEST, "non-object search body");
    Ok(())
}

#[tokio::test]
async fn create_answers_with_the_entity_id_key() -> anyhow::Result<()> {
    let app = flat_app().await?;
    let cases = [
        ("/add-new-course", "courseId"),
        ("/add-new-scholarship", "userId"),
        ("/add-new-university", "userId"),
    ];
    for (path, key) in cases {
        let (status, body) = app
            .json(Method::POST, path, Some(json!({ "destination": "Japan" })))
            .await?;
        assert_status(status, StatusCode::CREATED, path);
        assert!(is_object_id_hex(&body[key]), "{path}: {body}");
        assert_eq!(body[key], body["id"]);
    }
    Ok(())
}

#[tokio::test]
async fn get_search_filters_by_query_string() -> anyhow::Result<()> {
    let app = flat_app().await?;

    let (status, body) = app
        .json(Method::GET, "/api/search/course?destination=canada", None)
        .await?;
    assert_status(status, StatusCode::OK, "query search");
    assert_eq!(ids(&body["data"]), vec!["c1", "c3"]);

    let (_, body) = app
        .json(Method::GET, "/api/search/course?studyLevel=BACH&unknown=x", None)
        .await?;
    assert_eq!(ids(&body["data"]), vec!["c2"]);
    Ok(())
}

#[tokio::test]
async fn get_search_without_query_lists_everything() -> anyhow::Result<()> {
    let app = flat_app().await?;
    let (status, body) = app.json(Method::GET, "/api/search/events", None).await?;
    assert_status(status, StatusCode::OK, "unfiltered search");
    assert_eq!(ids(&body["data"]), vec!["e1", "e2", "e3"]);
    Ok(())
}

#[tokio::test]
async fn search_input_is_matched_literally() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    app.seed(
        "courses",
        vec![
            doc! { "_id": "a", "subject": "C++ Programming" },
            doc! { "_id": "b", "subject": "Cobol" },
        ],
    )
    .await;

    let (_, body) = app
        .json(Method::GET, "/api/search/course?subject=c%2B", None)
        .await?;
    assert_eq!(ids(&body["data"]), vec!["a"]);

    let (_, body) = app
        .json(Method::POST, "/api/search/course", Some(json!({ "subject": ".*" })))
        .await?;
    assert_eq!(body["data"], json!([]));
    Ok(())
}

#[tokio::test]
async fn list_returns_logical_records() -> anyhow::Result<()> {
    for app in [flat_app().await?, nested_app().await?] {
        let (status, body) = app.json(Method::GET, "/api/course", None).await?;
        assert_status(status, StatusCode::OK, "list courses");
        assert_eq!(ids(&body), vec!["c1", "c2", "c3"]);
        assert!(body[0].get("data").is_none());
    }
    Ok(())
}

#[tokio::test]
async fn read_by_string_and_object_id() -> anyhow::Result<()> {
    let app = flat_app().await?;
    let oid = ObjectId::new();
    app.seed(
        "scholarships",
        vec![doc! { "_id": oid, "studyLevel": "PhD", "destination": "Japan" }],
    )
    .await;

    let (status, body) = app.json(Method::GET, "/api/course/c2", None).await?;
    assert_status(status, StatusCode::OK, "read by string id");
    assert_eq!(body["destination"], json!("UK"));

    let path = format!("/api/scholarship/{}", oid.to_hex());
    let (status, body) = app.json(Method::GET, &path, None).await?;
    assert_status(status, StatusCode::OK, "read by object id");
    assert_eq!(body["_id"], json!(oid.to_hex()));
    Ok(())
}

#[tokio::test]
async fn read_missing_record_is_not_found() -> anyhow::Result<()> {
    for app in [flat_app().await?, nested_app().await?] {
        let (status, body) = app.json(Method::GET, "/api/course/missing", None).await?;
        assert_status(status, StatusCode::NOT_FOUND, "missing course");
        assert_eq!(body, json!({ "success": false, "message": "Course not found" }));
    }
    Ok(())
}

#[tokio::test]
async fn create_then_read_back() -> anyhow::Result<()> {
    for app in [flat_app().await?, nested_app().await?] {
        let (status, body) = app
            .json(
                Method::POST,
                "/add-new-event",
                Some(json!({ "city": "Sydney", "month": "March", "destination": "Australia" })),
            )
            .await?;
        assert_status(status, StatusCode::CREATED, "create event");
        assert_eq!(body["message"], json!("Event added successfully"));
        assert!(is_object_id_hex(&body["id"]), "id: {}", body["id"]);
        assert_eq!(body["eventId"], body["id"]);

        let path = format!("/api/event/{}", body["id"].as_str().unwrap_or_default());
        let (status, record) = app.json(Method::GET, &path, None).await?;
        assert_status(status, StatusCode::OK, "read created event");
        assert_eq!(record["city"], json!("Sydney"));
    }
    Ok(())
}

#[tokio::test]
async fn update_sets_fields() -> anyhow::Result<()> {
    for app in [flat_app().await?, nested_app().await?] {
        let (status, body) = app
            .json(
                Method::PUT,
                "/api/course/c3",
                Some(json!({ "_id": "ignored", "subject": "Marine Biology" })),
            )
            .await?;
        assert_status(status, StatusCode::OK, "update course");
        assert_eq!(
            body,
            json!({ "success": true, "matchedCount": 1, "modifiedCount": 1 })
        );

        let (_, record) = app.json(Method::GET, "/api/course/c3", None).await?;
        assert_eq!(record["subject"], json!("Marine Biology"));
        assert_eq!(record["destination"], json!("Canada"));
    }
    Ok(())
}

#[tokio::test]
async fn update_rejects_bad_input() -> anyhow::Result<()> {
    let app = flat_app().await?;

    let (status, body) = app
        .json(Method::PUT, "/api/course/c1", Some(json!({ "_id": "c9" })))
        .await?;
    assert_status(status, StatusCode::BAD_REQUEST, "empty change set");
    assert_eq!(body["success"], json!(false));

    let (status, _) = app
        .json(Method::PUT, "/api/course/c1", Some(json!({ "$set": { "a": 1 } })))
        .await?;
    assert_status(status, StatusCode::BAD_REQUEST, "operator key");

    let (status, _) = app
        .json(Method::PUT, "/api/course/nope", Some(json!({ "subject": "Law" })))
        .await?;
    assert_status(status, StatusCode::NOT_FOUND, "update missing");

    let (status, _, _) = app
        .request_raw(Method::PUT, "/api/course/c1", "[1, 2, 3]")
        .await?;
    assert_status(status, StatusCode::BAD_REQUEST, "array body");
    Ok(())
}

#[tokio::test]
async fn delete_removes_one_record() -> anyhow::Result<()> {
    for app in [flat_app().await?, nested_app().await?] {
        let (status, body) = app.json(Method::DELETE, "/api/course/c1", None).await?;
        assert_status(status, StatusCode::OK, "delete course");
        assert_eq!(body, json!({ "success": true, "deletedCount": 1 }));

        let (_, body) = app.json(Method::GET, "/api/course", None).await?;
        assert_eq!(ids(&body), vec!["c2", "c3"]);

        let (status, _) = app.json(Method::DELETE, "/api/course/c1", None).await?;
        assert_status(status, StatusCode::NOT_FOUND, "delete twice");
    }
    Ok(())
}
