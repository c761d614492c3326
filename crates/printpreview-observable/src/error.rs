//! Observable errors.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ObservableError {
    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("Not an object or array at: {0}")]
    NotAContainer(String),

    #[error("Invalid index {index} at: {path}")]
    InvalidIndex { path: String, index: String },
}
