//! World Wise Scholar server
//!
//! REST API over the World Wise Scholar MongoDB collections:
//! - Catalog of courses, scholarships, universities and events with
//!   keyword search over flat or nested collections
//! - User registration and role lookups
//! - "Help from WWS" enquiries
//! - Collaboration posts with best-effort mail notices
//!
//! Query construction lives in the `wws-query` crate; this crate wires it to
//! HTTP, MongoDB, and SMTP.

pub mod api;
pub mod background;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod state;
pub mod workers;

pub use config::Config;
pub use error::{Error, Result};
pub use state::AppState;
