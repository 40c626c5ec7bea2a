//! MongoDB-backed document store

use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Bson, Document},
    options::{ClientOptions, IndexOptions, ServerApi, ServerApiVersion},
    Client, Collection, Database, IndexModel,
};
use wws_query::{DeletePlan, InsertPlan, ReadPlan, UpdateCounts, UpdatePlan};

use super::{record_operation, traits::DocumentStore};
use crate::{config::DatabaseConfig, error::is_duplicate_key, Error, Result};

#[derive(Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    /// Connects with the stable server API (v1, strict, deprecation errors).
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let mut options = ClientOptions::parse(&config.uri).await?;
        options.app_name = Some(config.app_name.clone());
        options.max_pool_size = Some(config.max_pool_size);
        options.min_pool_size = Some(config.min_pool_size);
        options.server_selection_timeout =
            Some(Duration::from_secs(config.server_selection_timeout_secs));
        options.server_api = Some(
            ServerApi::builder()
                .version(ServerApiVersion::V1)
                .strict(true)
                .deprecation_errors(true)
                .build(),
        );

        let client = Client::with_options(options)?;
        let db = client.database(&config.name);

        tracing::info!(database = %config.name, "MongoDB client created");

        Ok(Self { db })
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.db.collection::<Document>(name)
    }

    async fn collect(&self, collection: &str, plan: &ReadPlan) -> Result<Vec<Document>> {
        let coll = self.collection(collection);
        let docs = match plan {
            ReadPlan::Find(filter) => {
                coll.find(filter.to_document())
                    .await?
                    .try_collect::<Vec<_>>()
                    .await?
            }
            ReadPlan::Aggregate(_) => {
                coll.aggregate(plan.pipeline())
                    .await?
                    .try_collect::<Vec<_>>()
                    .await?
            }
        };
        Ok(docs)
    }

    async fn first(&self, collection: &str, plan: &ReadPlan) -> Result<Option<Document>> {
        let coll = self.collection(collection);
        match plan {
            ReadPlan::Find(filter) => Ok(coll.find_one(filter.to_document()).await?),
            ReadPlan::Aggregate(_) => {
                let mut pipeline = plan.pipeline();
                pipeline.push(doc! { "$limit": 1 });
                let mut cursor = coll.aggregate(pipeline).await?;
                Ok(cursor.try_next().await?)
            }
        }
    }

    async fn store(&self, collection: &str, plan: &InsertPlan) -> Result<Bson> {
        let coll = self.collection(collection);
        let outcome = match plan {
            InsertPlan::Insert(record) => coll
                .insert_one(record.clone())
                .await
                .map(|result| result.inserted_id),
            InsertPlan::Push { .. } => {
                let update = plan
                    .update()
                    .ok_or_else(|| Error::Internal("push plan without update".into()))?;
                let id = plan
                    .record_id()
                    .cloned()
                    .ok_or_else(|| Error::Internal("pushed record without _id".into()))?;
                coll.update_one(plan.query(), update)
                    .upsert(true)
                    .await
                    .map(|_| id)
            }
        };

        outcome.map_err(|err| {
            if is_duplicate_key(&err) {
                Error::Conflict("Document already exists".into())
            } else {
                Error::Database(err)
            }
        })
    }

    async fn modify(&self, collection: &str, plan: &UpdatePlan) -> Result<UpdateCounts> {
        let coll = self.collection(collection);
        let action = coll.update_one(plan.query(), plan.update());
        let result = match plan.array_filters() {
            Some(filters) => action.array_filters(filters).await,
            None => action.await,
        }
        .map_err(|err| {
            if is_duplicate_key(&err) {
                Error::Conflict("Document already exists".into())
            } else {
                Error::Database(err)
            }
        })?;

        Ok(UpdateCounts {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn remove(&self, collection: &str, plan: &DeletePlan) -> Result<u64> {
        let coll = self.collection(collection);
        match plan.update() {
            None => Ok(coll.delete_one(plan.query()).await?.deleted_count),
            Some(pull) => Ok(coll.update_one(plan.query(), pull).await?.modified_count),
        }
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn ping(&self) -> Result<()> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn read(&self, collection: &str, plan: &ReadPlan) -> Result<Vec<Document>> {
        let start = Instant::now();
        let result = self.collect(collection, plan).await;
        record_operation(collection, "read", start, &result);
        result
    }

    async fn read_one(&self, collection: &str, plan: &ReadPlan) -> Result<Option<Document>> {
        let start = Instant::now();
        let result = self.first(collection, plan).await;
        record_operation(collection, "read_one", start, &result);
        result
    }

    async fn insert(&self, collection: &str, plan: &InsertPlan) -> Result<Bson> {
        let start = Instant::now();
        let result = self.store(collection, plan).await;
        record_operation(collection, "insert", start, &result);
        result
    }

    async fn update(&self, collection: &str, plan: &UpdatePlan) -> Result<UpdateCounts> {
        let start = Instant::now();
        let result = self.modify(collection, plan).await;
        record_operation(collection, "update", start, &result);
        result
    }

    async fn delete(&self, collection: &str, plan: &DeletePlan) -> Result<u64> {
        let start = Instant::now();
        let result = self.remove(collection, plan).await;
        record_operation(collection, "delete", start, &result);
        result
    }

    async fn ensure_unique(&self, collection: &str, field: &str) -> Result<()> {
        let mut keys = Document::new();
        keys.insert(field, 1);
        let index = IndexModel::builder()
            .keys(keys)
            .options(IndexOptions::builder().unique(true).build())
            .build();
        let created = self.collection(collection).create_index(index).await?;

        tracing::info!(
            collection = collection,
            field = field,
            index = %created.index_name,
            "Unique index ensured"
        );
        Ok(())
    }
}
