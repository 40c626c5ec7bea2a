//! Prometheus metrics for the World Wise Scholar server.

use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, register_int_gauge, register_int_gauge_vec,
    HistogramVec, IntCounterVec, IntGauge, IntGaugeVec,
};

use crate::models::CatalogEntity;

lazy_static! {
    // HTTP Request Metrics

    /// Total HTTP requests by method, path, and status
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "wws_http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .expect("Failed to register HTTP_REQUESTS_TOTAL");

    /// HTTP request duration in seconds
    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "wws_http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .expect("Failed to register HTTP_REQUEST_DURATION_SECONDS");

    /// In-flight HTTP requests
    pub static ref HTTP_REQUESTS_IN_FLIGHT: IntGaugeVec = register_int_gauge_vec!(
        "wws_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
        &["method", "path"]
    )
    .expect("Failed to register HTTP_REQUESTS_IN_FLIGHT");

    /// HTTP response size in bytes
    pub static ref HTTP_RESPONSE_SIZE_BYTES: HistogramVec = register_histogram_vec!(
        "wws_http_response_size_bytes",
        "HTTP response size in bytes",
        &["method", "path", "status"],
        vec![100.0, 1_000.0, 10_000.0, 100_000.0, 1_000_000.0, 10_000_000.0]
    )
    .expect("Failed to register HTTP_RESPONSE_SIZE_BYTES");

    // Store Metrics

    /// Store operations by collection, operation, and outcome
    pub static ref STORE_OPERATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "wws_store_operations_total",
        "Total number of document store operations",
        &["collection", "operation", "status"]
    )
    .expect("Failed to register STORE_OPERATIONS_TOTAL");

    /// Store operation duration
    pub static ref STORE_OPERATION_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "wws_store_operation_duration_seconds",
        "Document store operation duration in seconds",
        &["collection", "operation"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
    )
    .expect("Failed to register STORE_OPERATION_DURATION_SECONDS");

    // Notification Metrics

    /// Collaboration notices by outcome (sent, failed, dropped, disabled)
    pub static ref NOTIFICATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "wws_notifications_total",
        "Total number of collaboration notices by outcome",
        &["outcome"]
    )
    .expect("Failed to register NOTIFICATIONS_TOTAL");

    /// Notices waiting for the mail worker
    pub static ref NOTIFICATION_QUEUE_DEPTH: IntGauge = register_int_gauge!(
        "wws_notification_queue_depth",
        "Number of collaboration notices waiting to be sent"
    )
    .expect("Failed to register NOTIFICATION_QUEUE_DEPTH");
}

/// Label for requests that match no route.
pub const UNMATCHED_PATH: &str = "unmatched";

/// Maps a request path to its route template so metric labels stay bounded.
///
/// Identifiers are replaced by placeholders and paths outside the route table
/// collapse to [`UNMATCHED_PATH`].
pub fn sanitize_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let list = |plural: &str| CatalogEntity::ALL.iter().any(|e| e.plural() == plural);
    let single = |singular: &str| CatalogEntity::ALL.iter().any(|e| e.singular() == singular);

    match segments.as_slice() {
        [] => "/".to_string(),
        [page @ ("health" | "metrics" | "favicon.ico" | "users" | "post-users" | "help-from-wws"
        | "collaborate")] => format!("/{page}"),
        ["user", "ambassador"] => "/user/ambassador".to_string(),
        ["user", "ambassador", _] => "/user/ambassador/:id".to_string(),
        [lookup @ ("getUser" | "getAdmin" | "getAmbassador"), _] => format!("/{lookup}/:email"),
        ["help-from-wws", _] => "/help-from-wws/:id".to_string(),
        ["api", "search", plural] if list(*plural) => format!("/api/search/{plural}"),
        ["api", plural] if list(*plural) => format!("/api/{plural}"),
        ["api", singular, _] if single(*singular) => format!("/api/{singular}/:id"),
        [create] if create.strip_prefix("add-new-").is_some_and(single) => format!("/{create}"),
        _ => UNMATCHED_PATH.to_string(),
    }
}
