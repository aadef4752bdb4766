//! Output module for exporting crawl results
//!
//! This module handles:
//! - Deferred export: interchange JSON files bulk-imported into a sink
//! - Restoring sink collections from previously exported files
//! - Dumping a stored collection back out to a JSON file
//! - Crawl statistics and the end-of-run summary

pub mod stats;

pub use stats::{print_report, CrawlReport, TraversalStats};

use crate::model::EntityKind;
use crate::state::RecordStore;
use crate::storage::{read_documents, write_documents, DocumentSink, SqliteDocumentStore};
use crate::Result;
use std::path::{Path, PathBuf};

/// Path of the interchange file for `kind` inside `export_dir`
pub fn interchange_path(export_dir: &Path, kind: EntityKind) -> PathBuf {
    export_dir.join(format!("{}.json", kind.collection_name()))
}

/// Writes one collection of the store to its interchange file, then
/// bulk-imports that file into `sink`
///
/// # Returns
///
/// The number of documents imported
pub fn export_collection(
    store: &RecordStore,
    kind: EntityKind,
    export_dir: &Path,
    sink: &mut dyn DocumentSink,
) -> Result<usize> {
    let path = interchange_path(export_dir, kind);
    let documents = store.documents(kind)?;

    write_documents(&path, &documents)?;
    tracing::info!(
        "Wrote {} {} to {}",
        documents.len(),
        kind,
        path.display()
    );

    import_json_file(sink, &path, kind.collection_name())
}

/// Exports both collections; books first, then authors
pub fn export_store(
    store: &RecordStore,
    export_dir: &Path,
    sink: &mut dyn DocumentSink,
) -> Result<(usize, usize)> {
    let books = export_collection(store, EntityKind::Books, export_dir, sink)?;
    let authors = export_collection(store, EntityKind::Authors, export_dir, sink)?;
    Ok((books, authors))
}

/// Reads an interchange file and inserts every document into `collection`
///
/// An unknown collection name imports nothing and is not an error.
pub fn import_json_file(
    sink: &mut dyn DocumentSink,
    path: &Path,
    collection: &str,
) -> Result<usize> {
    if EntityKind::from_collection_name(collection).is_none() {
        tracing::warn!(
            "Skipping import of {}: unknown collection '{}'",
            path.display(),
            collection
        );
        return Ok(0);
    }

    let documents = read_documents(path)?;
    let inserted = sink.insert_many(collection, &documents)?;
    tracing::info!(
        "Imported {} documents from {} into {}",
        inserted,
        path.display(),
        collection
    );
    Ok(inserted)
}

/// Re-imports both collections from the interchange files in `export_dir`
///
/// Missing files are skipped with a warning.
pub fn restore_collections(
    export_dir: &Path,
    sink: &mut dyn DocumentSink,
) -> Result<(usize, usize)> {
    let mut counts = [0usize; 2];

    for (slot, kind) in counts.iter_mut().zip(EntityKind::all()) {
        let path = interchange_path(export_dir, kind);
        if !path.exists() {
            tracing::warn!("No {} export found at {}", kind, path.display());
            continue;
        }
        *slot = import_json_file(sink, &path, kind.collection_name())?;
    }

    Ok((counts[0], counts[1]))
}

/// Writes every document of a stored collection to `path`
///
/// # Returns
///
/// The number of documents written (`0` and no file for an unknown collection)
pub fn dump_collection(
    database: &SqliteDocumentStore,
    collection: &str,
    path: &Path,
) -> Result<usize> {
    if EntityKind::from_collection_name(collection).is_none() {
        tracing::warn!("Nothing to dump: unknown collection '{}'", collection);
        return Ok(0);
    }

    let documents = database.documents(collection)?;
    write_documents(path, &documents)?;
    Ok(documents.len())
}
