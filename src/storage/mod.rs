//! Storage module for persisting crawled records
//!
//! This module handles everything that leaves the process:
//! - The `DocumentSink` trait both persistence backends implement
//! - A SQLite document store with one table per collection
//! - A line-delimited JSON file sink
//! - Interchange JSON files used by deferred export and restore

mod json;
mod jsonl;
mod schema;
mod sqlite;
mod traits;

pub use json::{read_documents, write_documents};
pub use jsonl::JsonLinesSink;
pub use sqlite::SqliteDocumentStore;
pub use traits::{DocumentSink, StorageError, StorageResult};

use crate::config::{OutputConfig, SinkKind};
use std::path::Path;

/// Opens the sink selected by the output configuration
pub fn open_sink(config: &OutputConfig) -> StorageResult<Box<dyn DocumentSink>> {
    match config.sink {
        SinkKind::Sqlite => Ok(Box::new(SqliteDocumentStore::new(Path::new(
            &config.database_path,
        ))?)),
        SinkKind::Jsonl => Ok(Box::new(JsonLinesSink::new(Path::new(&config.export_dir))?)),
    }
}
