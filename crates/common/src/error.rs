//! Error types for stepview

use thiserror::Error;

/// Result type alias using stepview's common Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the artifact store, the report tree and the output layout
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Integrity verification failed: {0}")]
    IntegrityError(String),

    #[error("Step already has attachments: {keyword}{name}")]
    AlreadyAttached { keyword: String, name: String },

    #[error("Resource not found: {kind} with id {id}")]
    NotFound { kind: String, id: String },
}
