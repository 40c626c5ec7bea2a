use std::sync::Arc;

use anyhow::Context as _;
use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use mongodb::bson::Document;
use serde_json::Value;
use tokio::task::JoinHandle;
use tower::ServiceExt as _;
use wws_server::{
    api::create_router,
    db::InMemoryStore,
    services::{MailMessage, NoticeTemplate, RecordingMailer},
    workers::spawn_notification_worker,
    AppState, Config,
};

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<InMemoryStore>,
    mailer: Arc<RecordingMailer>,
    worker: JoinHandle<()>,
}

impl TestApp {
    pub async fn new() -> anyhow::Result<Self> {
        Self::build(|_| {}, RecordingMailer::new()).await
    }

    pub async fn new_with_config(configure: impl FnOnce(&mut Config)) -> anyhow::Result<Self> {
        Self::build(configure, RecordingMailer::new()).await
    }

    pub async fn with_mailer(mailer: RecordingMailer) -> anyhow::Result<Self> {
        Self::build(|_| {}, mailer).await
    }

    async fn build(
        configure: impl FnOnce(&mut Config),
        mailer: RecordingMailer,
    ) -> anyhow::Result<Self> {
        let mut config = Config::defaults();
        configure(&mut config);

        let store = Arc::new(InMemoryStore::new());
        let mailer = Arc::new(mailer);
        let template = NoticeTemplate {
            from: "noreply@example.com".into(),
            to: "team@example.com".into(),
            greeting: "Team".into(),
            signature: "World Wise Scholar Team".into(),
        };
        let (notifier, worker) = spawn_notification_worker(mailer.clone(), template, 16);

        let state = AppState::with_store(config, store.clone(), notifier)
            .await
            .context("initialize AppState")?;
        let router = create_router(state.clone());

        Ok(Self {
            router,
            state,
            store,
            mailer,
            worker,
        })
    }

    pub async fn seed(&self, collection: &str, docs: Vec<Document>) {
        self.store.seed(collection, docs).await;
    }

    pub async fn request(
        &self,
        method: Method,
        path_and_query: &str,
        body: Option<Value>,
    ) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        let body = match body {
            Some(value) => Body::from(serde_json::to_vec(&value)?),
            None => Body::empty(),
        };
        self.send(method, path_and_query, body).await
    }

    pub async fn request_raw(
        &self,
        method: Method,
        path_and_query: &str,
        body: &'static str,
    ) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        self.send(method, path_and_query, Body::from(body)).await
    }

    async fn send(
        &self,
        method: Method,
        path_and_query: &str,
        body: Body,
    ) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        let request = Request::builder()
            .method(method)
            .uri(path_and_query)
            .header("host", "example.org")
            .header("content-type", "application/json")
            .body(body)
            .context("build request")?;

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .context("dispatch request")?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .context("read response body")?;

        Ok((status, headers, body))
    }

    /// Sends a request and parses the JSON response body.
    pub async fn json(
        &self,
        method: Method,
        path_and_query: &str,
        body: Option<Value>,
    ) -> anyhow::Result<(StatusCode, Value)> {
        let (status, _headers, bytes) = self.request(method, path_and_query, body).await?;
        let value = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse JSON response of {path_and_query}"))?;
        Ok((status, value))
    }

    /// Shuts the app down and returns every mail the worker delivered.
    pub async fn delivered_mail(self) -> anyhow::Result<Vec<MailMessage>> {
        let Self {
            router,
            state,
            mailer,
            worker,
            ..
        } = self;
        drop(router);
        drop(state);
        worker.await.context("notification worker panicked")?;
        Ok(mailer.sent().await)
    }
}

pub fn assert_status(actual: StatusCode, expected: StatusCode, context: &str) {
    assert_eq!(actual, expected, "unexpected status for {context}");
}

/// Sorted string `_id`s of a JSON array of records.
pub fn ids(records: &Value) -> Vec<String> {
    let mut ids: Vec<String> = records
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item["_id"].as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default();
    ids.sort();
    ids
}

pub fn is_object_id_hex(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|s| s.len() == 24 && s.chars().all(|c| c.is_ascii_hexdigit()))
}
