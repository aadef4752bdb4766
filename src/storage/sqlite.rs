//! SQLite document store
//!
//! This module provides a SQLite-based implementation of the DocumentSink trait.

use crate::model::EntityKind;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{DocumentSink, StorageError, StorageResult};
use chrono::Utc;
use rusqlite::{params, Connection};
use serde_json::Value;
use std::path::Path;

/// SQLite-backed document store with a `books` and an `authors` collection
pub struct SqliteDocumentStore {
    conn: Connection,
}

impl SqliteDocumentStore {
    /// Opens (or creates) the document store at `path`
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory store, for tests and dry runs
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Number of documents in `collection` (`0` for an unknown collection)
    pub fn count(&self, collection: &str) -> StorageResult<u64> {
        let Some(kind) = EntityKind::from_collection_name(collection) else {
            return Ok(0);
        };

        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", kind.collection_name()),
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// All documents in `collection`, in insertion order
    pub fn documents(&self, collection: &str) -> StorageResult<Vec<Value>> {
        let Some(kind) = EntityKind::from_collection_name(collection) else {
            return Ok(Vec::new());
        };

        let mut stmt = self.conn.prepare(&format!(
            "SELECT document FROM {} ORDER BY id",
            kind.collection_name()
        ))?;

        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut documents = Vec::new();
        for row in rows {
            documents.push(serde_json::from_str(&row?)?);
        }
        Ok(documents)
    }

    fn insert(conn: &Connection, kind: EntityKind, document: &Value) -> StorageResult<()> {
        let url = document
            .get("url")
            .and_then(Value::as_str)
            .ok_or_else(|| StorageError::Database("document has no url".to_string()))?;

        conn.execute(
            &format!(
                "INSERT INTO {} (url, document, inserted_at) VALUES (?1, ?2, ?3)",
                kind.collection_name()
            ),
            params![url, serde_json::to_string(document)?, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}

impl DocumentSink for SqliteDocumentStore {
    fn insert_one(&mut self, collection: &str, document: &Value) -> StorageResult<bool> {
        let Some(kind) = EntityKind::from_collection_name(collection) else {
            tracing::debug!("Ignoring insert into unknown collection '{}'", collection);
            return Ok(false);
        };

        Self::insert(&self.conn, kind, document)?;
        Ok(true)
    }

    fn insert_many(&mut self, collection: &str, documents: &[Value]) -> StorageResult<usize> {
        let Some(kind) = EntityKind::from_collection_name(collection) else {
            tracing::debug!("Ignoring bulk insert into unknown collection '{}'", collection);
            return Ok(0);
        };

        let tx = self.conn.transaction()?;
        for document in documents {
            Self::insert(&tx, kind, document)?;
        }
        tx.commit()?;

        Ok(documents.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_one_and_read_back() {
        let mut store = SqliteDocumentStore::new_in_memory().unwrap();
        let doc = json!({"url": "http://site/book/1", "title": "Emma"});

        assert!(store.insert_one("books", &doc).unwrap());
        assert_eq!(store.count("books").unwrap(), 1);
        assert_eq!(store.count("authors").unwrap(), 0);
        assert_eq!(store.documents("books").unwrap(), vec![doc]);
    }

    #[test]
    fn test_unknown_collection_is_a_no_op() {
        let mut store = SqliteDocumentStore::new_in_memory().unwrap();
        let doc = json!({"url": "http://site/book/1"});

        assert!(!store.insert_one("reviews", &doc).unwrap());
        assert_eq!(store.insert_many("reviews", &[doc]).unwrap(), 0);
        assert_eq!(store.count("reviews").unwrap(), 0);
        assert!(store.documents("reviews").unwrap().is_empty());
    }

    #[test]
    fn test_insert_many_preserves_order() {
        let mut store = SqliteDocumentStore::new_in_memory().unwrap();
        let docs = vec![
            json!({"url": "http://site/author/2", "name": "B"}),
            json!({"url": "http://site/author/1", "name": "A"}),
        ];

        assert_eq!(store.insert_many("authors", &docs).unwrap(), 2);
        assert_eq!(store.documents("authors").unwrap(), docs);
    }

    #[test]
    fn test_document_without_url_is_rejected() {
        let mut store = SqliteDocumentStore::new_in_memory().unwrap();
        let result = store.insert_one("books", &json!({"title": "Orphan"}));
        assert!(matches!(result, Err(StorageError::Database(_))));
    }

    #[test]
    fn test_failed_bulk_insert_writes_nothing() {
        let mut store = SqliteDocumentStore::new_in_memory().unwrap();
        let docs = vec![json!({"url": "http://site/book/1"}), json!({"title": "Orphan"})];

        assert!(store.insert_many("books", &docs).is_err());
        assert_eq!(store.count("books").unwrap(), 0);
    }

    #[test]
    fn test_file_backed_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.db");

        {
            let mut store = SqliteDocumentStore::new(&path).unwrap();
            store
                .insert_one("authors", &json!({"url": "http://site/author/1"}))
                .unwrap();
        }

        let store = SqliteDocumentStore::new(&path).unwrap();
        assert_eq!(store.count("authors").unwrap(), 1);
    }
}
