//! Storage traits and error types
//!
//! This module defines the trait interface for document sinks and
//! associated error types.

use serde_json::Value;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Malformed interchange file {path}: {message}")]
    Interchange { path: String, message: String },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for document sink implementations
///
/// A sink holds named collections of JSON documents. Collection names are
/// routed through [`crate::model::EntityKind::from_collection_name`]; a name
/// that does not route is accepted and ignored rather than reported as an error.
pub trait DocumentSink {
    /// Inserts a single document
    ///
    /// # Returns
    ///
    /// `true` if the document was written, `false` if `collection` is unknown
    fn insert_one(&mut self, collection: &str, document: &Value) -> StorageResult<bool>;

    /// Inserts many documents, preserving their order
    ///
    /// # Returns
    ///
    /// The number of documents written (`0` for an unknown collection)
    fn insert_many(&mut self, collection: &str, documents: &[Value]) -> StorageResult<usize>;
}
