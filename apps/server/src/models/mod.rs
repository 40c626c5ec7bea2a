//! Domain models

pub mod catalog;

pub use catalog::{Catalog, CatalogCollection, CatalogEntity, CollectionHandle};
