//! Storage trait for the document collections

use async_trait::async_trait;
use mongodb::bson::{Bson, Document};
use wws_query::{DeletePlan, InsertPlan, ReadPlan, UpdateCounts, UpdatePlan};

use crate::Result;

/// Executes query plans against named collections.
///
/// Plans are produced by [`wws_query::ShapeAdapter`], so implementations never
/// need to know whether a collection is flat or nested. Backends are MongoDB
/// in production and an in-memory map in tests.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Checks that the backend is reachable.
    async fn ping(&self) -> Result<()>;

    /// Returns every record selected by `plan`, in storage order.
    async fn read(&self, collection: &str, plan: &ReadPlan) -> Result<Vec<Document>>;

    /// Returns the first record selected by `plan`.
    async fn read_one(&self, collection: &str, plan: &ReadPlan) -> Result<Option<Document>>;

    /// Stores a record and returns its identifier.
    ///
    /// # Errors
    /// * `Conflict` - a unique index rejected the record
    async fn insert(&self, collection: &str, plan: &InsertPlan) -> Result<Bson>;

    /// Applies `plan` to the first matching record.
    async fn update(&self, collection: &str, plan: &UpdatePlan) -> Result<UpdateCounts>;

    /// Removes the first matching record; returns how many were removed.
    async fn delete(&self, collection: &str, plan: &DeletePlan) -> Result<u64>;

    /// Ensures `field` is unique across the documents of `collection`.
    async fn ensure_unique(&self, collection: &str, field: &str) -> Result<()>;
}
