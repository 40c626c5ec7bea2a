//! Enquiry service - "help from WWS" submissions

use std::sync::Arc;

use mongodb::bson::{doc, Bson, Document};
use wws_query::{resolve, Filter, UpdateCounts};

use crate::{db::DocumentStore, models::Catalog, Error, Result};

pub struct EnquiryService {
    store: Arc<dyn DocumentStore>,
    catalog: Arc<Catalog>,
}

impl EnquiryService {
    pub fn new(store: Arc<dyn DocumentStore>, catalog: Arc<Catalog>) -> Self {
        Self { store, catalog }
    }

    pub async fn list(&self) -> Result<Vec<Document>> {
        let help = &self.catalog.help;
        self.store
            .read(&help.name, &help.adapter.read(Filter::All))
            .await
    }

    /// Enquiries submitted by `email` (exact match).
    pub async fn by_email(&self, email: &str) -> Result<Vec<Document>> {
        let help = &self.catalog.help;
        let filter = self.catalog.help_by_email.build([("userEmail", email)]);
        self.store
            .read(&help.name, &help.adapter.read(filter))
            .await
    }

    pub async fn submit(&self, enquiry: Document) -> Result<Bson> {
        let help = &self.catalog.help;
        let id = self
            .store
            .insert(&help.name, &help.adapter.insert(enquiry))
            .await?;
        tracing::info!(id = %id, "Enquiry submitted");
        Ok(id)
    }

    pub async fn set_status(&self, id: &str, status: Bson) -> Result<UpdateCounts> {
        let help = &self.catalog.help;
        let plan = help.adapter.update(resolve(id), doc! { "status": status })?;
        let counts = self.store.update(&help.name, &plan).await?;
        if counts.matched == 0 {
            return Err(Error::NotFound("Enquiry not found".into()));
        }
        Ok(counts)
    }

    pub async fn delete(&self, id: &str) -> Result<u64> {
        let help = &self.catalog.help;
        let deleted = self
            .store
            .delete(&help.name, &help.adapter.delete(resolve(id)))
            .await?;
        if deleted == 0 {
            return Err(Error::NotFound("Enquiry not found".into()));
        }
        Ok(deleted)
    }
}
