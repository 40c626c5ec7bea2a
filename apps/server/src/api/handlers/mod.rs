//! HTTP request handlers

pub mod catalog;
pub mod collaborate;
pub mod enquiries;
pub mod metrics;
pub mod users;
