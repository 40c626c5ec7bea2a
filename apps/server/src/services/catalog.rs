//! Catalog service - courses, scholarships, universities and events

use std::sync::Arc;

use mongodb::bson::{Bson, Document};
use wws_query::{resolve, Filter, UpdateCounts};

use crate::{
    db::DocumentStore,
    models::{Catalog, CatalogCollection, CatalogEntity},
    Error, Result,
};

pub struct CatalogService {
    store: Arc<dyn DocumentStore>,
    catalog: Arc<Catalog>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn DocumentStore>, catalog: Arc<Catalog>) -> Self {
        Self { store, catalog }
    }

    fn collection(&self, entity: CatalogEntity) -> &CatalogCollection {
        self.catalog.entity(entity)
    }

    /// Every record of the entity.
    pub async fn list(&self, entity: CatalogEntity) -> Result<Vec<Document>> {
        let handle = &self.collection(entity).handle;
        self.store
            .read(&handle.name, &handle.adapter.read(Filter::All))
            .await
    }

    /// Records matching the supplied search fields.
    ///
    /// Fields combine with the entity's combinator; with no usable field the
    /// entity's empty-search behaviour applies.
    pub async fn search(
        &self,
        entity: CatalogEntity,
        fields: &[(String, String)],
    ) -> Result<Vec<Document>> {
        let collection = self.collection(entity);
        let filter = collection
            .search
            .build(fields.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        tracing::debug!(entity = ?entity, filter = %filter.to_document(), "Catalog search");

        self.store
            .read(&collection.handle.name, &collection.handle.adapter.read(filter))
            .await
    }

    /// Query-string search: like [`search`](Self::search), but a request
    /// without any usable field lists every record.
    pub async fn filter(
        &self,
        entity: CatalogEntity,
        query: &[(String, String)],
    ) -> Result<Vec<Document>> {
        let supplied = self
            .collection(entity)
            .search
            .supplied(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        if supplied.is_empty() {
            return self.list(entity).await;
        }
        self.search(entity, query).await
    }

    pub async fn get(&self, entity: CatalogEntity, id: &str) -> Result<Document> {
        let handle = &self.collection(entity).handle;
        self.store
            .read_one(&handle.name, &handle.adapter.read(resolve(id)))
            .await?
            .ok_or_else(|| not_found(entity))
    }

    pub async fn create(&self, entity: CatalogEntity, record: Document) -> Result<Bson> {
        let handle = &self.collection(entity).handle;
        let id = self
            .store
            .insert(&handle.name, &handle.adapter.insert(record))
            .await?;

        tracing::info!(entity = ?entity, id = %id, "Catalog record created");
        Ok(id)
    }

    pub async fn update(
        &self,
        entity: CatalogEntity,
        id: &str,
        changes: Document,
    ) -> Result<UpdateCounts> {
        let handle = &self.collection(entity).handle;
        let plan = handle.adapter.update(resolve(id), changes)?;
        let counts = self.store.update(&handle.name, &plan).await?;
        if counts.matched == 0 {
            return Err(not_found(entity));
        }
        Ok(counts)
    }

    pub async fn delete(&self, entity: CatalogEntity, id: &str) -> Result<u64> {
        let handle = &self.collection(entity).handle;
        let deleted = self
            .store
            .delete(&handle.name, &handle.adapter.delete(resolve(id)))
            .await?;
        if deleted == 0 {
            return Err(not_found(entity));
        }
        Ok(deleted)
    }
}

fn not_found(entity: CatalogEntity) -> Error {
    Error::NotFound(format!("{} not found", entity.label()))
}
