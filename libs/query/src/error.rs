use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid field path '{path}': {reason}")]
    InvalidFieldPath { path: String, reason: &'static str },

    #[error("invalid update field '{field}': {reason}")]
    InvalidChange { field: String, reason: &'static str },

    #[error("update must change at least one field")]
    EmptyChangeSet,
}
