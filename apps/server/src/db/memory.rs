//! In-memory document store.
//!
//! Evaluates plans with the `wws_query` evaluator over vectors of documents.
//! Used by the router tests.

use std::collections::HashMap;
use std::time::Instant;

use async_trait::async_trait;
use mongodb::bson::{Bson, Document};
use tokio::sync::RwLock;
use wws_query::{DeletePlan, InsertPlan, ReadPlan, UpdateCounts, UpdatePlan, ID_FIELD};

use super::{record_operation, traits::DocumentStore};
use crate::{Error, Result};

#[derive(Default)]
pub struct InMemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
    unique: RwLock<HashMap<String, Vec<String>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the contents of `collection` with `docs`.
    pub async fn seed(&self, collection: &str, docs: Vec<Document>) {
        self.collections
            .write()
            .await
            .insert(collection.to_string(), docs);
    }

    /// Raw documents of `collection`, wrappers included.
    pub async fn documents(&self, collection: &str) -> Vec<Document> {
        self.collections
            .read()
            .await
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    async fn unique_fields(&self, collection: &str) -> Vec<String> {
        self.unique
            .read()
            .await
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }
}

/// First unique field on which `candidate` collides with a document of `docs`.
fn find_collision<'a>(
    fields: &'a [String],
    docs: &[Document],
    candidate: &Document,
    skip: Option<usize>,
) -> Option<&'a str> {
    // `_id` is unique in every collection, as in MongoDB
    std::iter::once(ID_FIELD)
        .chain(fields.iter().map(String::as_str))
        .find(|field| {
            candidate.get(*field).is_some_and(|value| {
                docs.iter()
                    .enumerate()
                    .filter(|(index, _)| Some(*index) != skip)
                    .any(|(_, doc)| doc.get(*field) == Some(value))
            })
        })
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn read(&self, collection: &str, plan: &ReadPlan) -> Result<Vec<Document>> {
        let start = Instant::now();
        let guard = self.collections.read().await;
        let docs = guard.get(collection).map(Vec::as_slice).unwrap_or_default();
        let result = Ok(plan.execute(docs));
        record_operation(collection, "read", start, &result);
        result
    }

    async fn read_one(&self, collection: &str, plan: &ReadPlan) -> Result<Option<Document>> {
        let start = Instant::now();
        let guard = self.collections.read().await;
        let docs = guard.get(collection).map(Vec::as_slice).unwrap_or_default();
        let result = Ok(plan.execute(docs).into_iter().next());
        record_operation(collection, "read_one", start, &result);
        result
    }

    async fn insert(&self, collection: &str, plan: &InsertPlan) -> Result<Bson> {
        let start = Instant::now();
        let fields = self.unique_fields(collection).await;
        let mut guard = self.collections.write().await;
        let docs = guard.entry(collection.to_string()).or_default();

        let result = match plan {
            InsertPlan::Insert(record) => match find_collision(&fields, docs, record, None) {
                Some(field) => Err(Error::Conflict(format!("Duplicate value for {field}"))),
                None => Ok(plan.apply(docs)),
            },
            InsertPlan::Push { .. } => Ok(plan.apply(docs)),
        };
        record_operation(collection, "insert", start, &result);
        result
    }

    async fn update(&self, collection: &str, plan: &UpdatePlan) -> Result<UpdateCounts> {
        let start = Instant::now();
        let fields = self.unique_fields(collection).await;
        let mut guard = self.collections.write().await;
        let docs = guard.entry(collection.to_string()).or_default();

        let collision = match plan {
            UpdatePlan::Set { filter, changes } => docs
                .iter()
                .position(|doc| filter.matches(doc))
                .and_then(|index| find_collision(&fields, docs, changes, Some(index))),
            UpdatePlan::SetElement { .. } => None,
        };

        let result = match collision {
            Some(field) => Err(Error::Conflict(format!("Duplicate value for {field}"))),
            None => Ok(plan.apply(docs)),
        };
        record_operation(collection, "update", start, &result);
        result
    }

    async fn delete(&self, collection: &str, plan: &DeletePlan) -> Result<u64> {
        let start = Instant::now();
        let mut guard = self.collections.write().await;
        let docs = guard.entry(collection.to_string()).or_default();
        let result = Ok(plan.apply(docs));
        record_operation(collection, "delete", start, &result);
        result
    }

    async fn ensure_unique(&self, collection: &str, field: &str) -> Result<()> {
        let mut unique = self.unique.write().await;
        let fields = unique.entry(collection.to_string()).or_default();
        if !fields.iter().any(|f| f == field) {
            fields.push(field.to_string());
        }
        Ok(())
    }
}
