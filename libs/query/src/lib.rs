//! Query construction for the World Wise Scholar document collections.
//!
//! Every route of the service turns loosely-typed HTTP input into a MongoDB
//! operation. This crate owns that translation:
//! - [`id`] resolves a path identifier into a filter that matches either a
//!   native ObjectId or a verbatim string identifier
//! - [`builder`] turns optional search fields into case-insensitive substring
//!   or exact predicates combined with AND/OR semantics
//! - [`shape`] wraps a filter into an executable plan for collections that
//!   store one record per document or many records in an array field
//!
//! Plans compile to BSON for the driver and can also be evaluated in memory
//! against a slice of documents (see [`eval`]).

#![forbid(unsafe_code)]

pub mod builder;
mod error;
pub mod eval;
pub mod filter;
pub mod id;
pub mod shape;

pub use builder::{Combinator, EmptySearch, FieldRule, MatchKind, SearchSpec};
pub use error::{Error, Result};
pub use eval::UpdateCounts;
pub use filter::{validate_field_path, Condition, Filter, Predicate};
pub use id::{is_native_id, resolve, resolve_on, ID_FIELD};
pub use shape::{DeletePlan, InsertPlan, ReadPlan, Shape, ShapeAdapter, Stage, UpdatePlan};
