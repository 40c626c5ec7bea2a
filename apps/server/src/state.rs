//! Shared application state

use std::sync::Arc;

use crate::{
    background,
    config::Config,
    db::{DocumentStore, MongoStore},
    models::Catalog,
    services::{
        users::EMAIL_FIELD, CatalogService, CollaborationService, EnquiryService, Notifier,
        UserService,
    },
    Error, Result,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn DocumentStore>,
    pub catalog: Arc<Catalog>,
    pub catalog_service: Arc<CatalogService>,
    pub user_service: Arc<UserService>,
    pub enquiry_service: Arc<EnquiryService>,
    pub collaboration_service: Arc<CollaborationService>,
}

impl AppState {
    /// Connects to MongoDB, verifies the connection and starts the
    /// notification worker.
    pub async fn new(config: Config) -> Result<Self> {
        let store = MongoStore::connect(&config.database).await?;
        store.ping().await?;
        tracing::info!("Pinged MongoDB successfully");

        let notifier = background::start_notifications(&config.mail)?;
        Self::with_store(config, Arc::new(store), notifier).await
    }

    /// Builds the state over an existing store.
    pub async fn with_store(
        config: Config,
        store: Arc<dyn DocumentStore>,
        notifier: Notifier,
    ) -> Result<Self> {
        config
            .validate()
            .map_err(|e| Error::Internal(format!("Invalid configuration: {e}")))?;
        let catalog = Arc::new(Catalog::from_config(&config.collections)?);

        if config.database.ensure_indexes {
            store.ensure_unique(&catalog.users.name, EMAIL_FIELD).await?;
        }

        Ok(Self {
            catalog_service: Arc::new(CatalogService::new(store.clone(), catalog.clone())),
            user_service: Arc::new(UserService::new(store.clone(), catalog.clone())),
            enquiry_service: Arc::new(EnquiryService::new(store.clone(), catalog.clone())),
            collaboration_service: Arc::new(CollaborationService::new(
                store.clone(),
                catalog.clone(),
                notifier,
            )),
            config: Arc::new(config),
            store,
            catalog,
        })
    }
}
