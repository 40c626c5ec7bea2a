//! User service - registration, role lookups and ambassador management

use std::sync::Arc;

use mongodb::bson::{Bson, Document};
use wws_query::{resolve, Filter, UpdateCounts};

use crate::{db::DocumentStore, models::Catalog, Error, Result};

pub const EMAIL_FIELD: &str = "email";
pub const ROLE_FIELD: &str = "role";

/// Roles that can be looked up by email.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Admin,
    Ambassador,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::Ambassador => "ambassador",
        }
    }
}

pub struct UserService {
    store: Arc<dyn DocumentStore>,
    catalog: Arc<Catalog>,
}

impl UserService {
    pub fn new(store: Arc<dyn DocumentStore>, catalog: Arc<Catalog>) -> Self {
        Self { store, catalog }
    }

    pub async fn list(&self) -> Result<Vec<Document>> {
        let users = &self.catalog.users;
        self.store
            .read(&users.name, &users.adapter.read(Filter::All))
            .await
    }

    pub async fn ambassadors(&self) -> Result<Vec<Document>> {
        let users = &self.catalog.users;
        let filter = self
            .catalog
            .user_roles
            .build([(ROLE_FIELD, Role::Ambassador.as_str())]);
        self.store
            .read(&users.name, &users.adapter.read(filter))
            .await
    }

    /// Whether the user registered under `email` holds `role`.
    pub async fn has_role(&self, email: &str, role: Role) -> Result<bool> {
        let users = &self.catalog.users;
        let user = self
            .store
            .read_one(&users.name, &users.adapter.read(Filter::eq(EMAIL_FIELD, email)))
            .await?
            .ok_or_else(|| Error::NotFound("No user found".into()))?;

        Ok(matches!(user.get(ROLE_FIELD), Some(Bson::String(r)) if r == role.as_str()))
    }

    /// Registers a user; the email must be present and unused.
    ///
    /// Uniqueness is enforced by the store's unique index, so two concurrent
    /// registrations for one email cannot both succeed.
    pub async fn register(&self, user: Document) -> Result<Bson> {
        match user.get(EMAIL_FIELD) {
            Some(Bson::String(email)) if !email.trim().is_empty() => {}
            _ => return Err(Error::Validation("User data or email is missing".into())),
        }

        let users = &self.catalog.users;
        match self
            .store
            .insert(&users.name, &users.adapter.insert(user))
            .await
        {
            Ok(id) => {
                tracing::info!(id = %id, "User registered");
                Ok(id)
            }
            Err(err) if err.is_duplicate_key() => Err(Error::Conflict("User already exists".into())),
            Err(err) => Err(err),
        }
    }

    pub async fn update(&self, id: &str, changes: Document) -> Result<UpdateCounts> {
        let users = &self.catalog.users;
        let plan = users.adapter.update(resolve(id), changes)?;
        let counts = self.store.update(&users.name, &plan).await?;
        if counts.matched == 0 {
            return Err(Error::NotFound("User not found".into()));
        }
        Ok(counts)
    }
}
