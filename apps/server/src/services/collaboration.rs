//! Collaboration posts and their notices

use std::sync::Arc;

use mongodb::bson::{Bson, Document};
use wws_query::Filter;

use crate::{
    db::DocumentStore,
    models::Catalog,
    services::notification::{CollaborationNotice, Notifier},
    Result,
};

pub struct CollaborationService {
    store: Arc<dyn DocumentStore>,
    catalog: Arc<Catalog>,
    notifier: Notifier,
}

impl CollaborationService {
    pub fn new(store: Arc<dyn DocumentStore>, catalog: Arc<Catalog>, notifier: Notifier) -> Self {
        Self {
            store,
            catalog,
            notifier,
        }
    }

    pub async fn list(&self) -> Result<Vec<Document>> {
        let posts = &self.catalog.collaborate;
        self.store
            .read(&posts.name, &posts.adapter.read(Filter::All))
            .await
    }

    /// Stores the post, then queues a notice for the team.
    ///
    /// The notice is only queued once the post is stored; its delivery never
    /// affects the result.
    pub async fn submit(&self, post: Document) -> Result<Bson> {
        let notice = CollaborationNotice::from_document(&post);
        let posts = &self.catalog.collaborate;
        let id = self
            .store
            .insert(&posts.name, &posts.adapter.insert(post))
            .await?;

        tracing::info!(id = %id, "Collaboration post submitted");
        self.notifier.notify(notice);
        Ok(id)
    }
}
