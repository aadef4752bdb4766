//! The shared record store for a crawl run

use crate::model::{Author, Book, EntityKind, Record};
use crate::state::Collection;
use serde_json::Value;

/// Every book and author discovered during a crawl run
///
/// Both traversals work over the same store, so a book discovered from an
/// author page is visible to the book traversal and vice versa.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    pub books: Collection<Book>,
    pub authors: Collection<Author>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, kind: EntityKind, url: &str) -> bool {
        match kind {
            EntityKind::Books => self.books.contains(url),
            EntityKind::Authors => self.authors.contains(url),
        }
    }

    /// Registers `url` in the collection for `kind`, returning whether it was new
    pub fn register(&mut self, kind: EntityKind, url: &str) -> bool {
        match kind {
            EntityKind::Books => self.books.register(url).1,
            EntityKind::Authors => self.authors.register(url).1,
        }
    }

    pub fn len(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Books => self.books.len(),
            EntityKind::Authors => self.authors.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty() && self.authors.is_empty()
    }

    /// Snapshot of one collection as JSON documents, in discovery order
    pub fn documents(&self, kind: EntityKind) -> serde_json::Result<Vec<Value>> {
        match kind {
            EntityKind::Books => to_documents(self.books.all()),
            EntityKind::Authors => to_documents(self.authors.all()),
        }
    }
}

fn to_documents<R: Record>(records: &[R]) -> serde_json::Result<Vec<Value>> {
    records.iter().map(serde_json::to_value).collect()
}
