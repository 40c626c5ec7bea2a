//! Database layer - document store backends

pub mod memory;
pub mod mongo;
pub mod traits;

pub use memory::InMemoryStore;
pub use mongo::MongoStore;
pub use traits::DocumentStore;

use std::time::Instant;

/// Records the outcome and latency of a store operation.
pub(crate) fn record_operation<T>(
    collection: &str,
    operation: &str,
    start: Instant,
    result: &crate::Result<T>,
) {
    let status = match result {
        Ok(_) => "success",
        Err(err) if err.is_duplicate_key() => "conflict",
        Err(err) => {
            tracing::warn!(collection, operation, error = %err, "Store operation failed");
            "error"
        }
    };

    crate::metrics::STORE_OPERATIONS_TOTAL
        .with_label_values(&[collection, operation, status])
        .inc();
    crate::metrics::STORE_OPERATION_DURATION_SECONDS
        .with_label_values(&[collection, operation])
        .observe(start.elapsed().as_secs_f64());
}
