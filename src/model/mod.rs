//! Book and author records
//!
//! Records are keyed by URL. A freshly discovered record is a stub holding
//! only its URL; a visit fills in the remaining fields.

mod author;
mod book;

pub use author::Author;
pub use book::Book;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use url::Url;

/// The two entity types the crawler collects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Books,
    Authors,
}

impl EntityKind {
    /// Name of the document-store collection holding this entity type
    pub fn collection_name(&self) -> &'static str {
        match self {
            Self::Books => "books",
            Self::Authors => "authors",
        }
    }

    /// Routes a collection name to its entity type
    ///
    /// Unknown names yield `None`; persistence callers treat that as a no-op.
    pub fn from_collection_name(name: &str) -> Option<Self> {
        match name {
            "books" => Some(Self::Books),
            "authors" => Some(Self::Authors),
            _ => None,
        }
    }

    pub fn all() -> [Self; 2] {
        [Self::Books, Self::Authors]
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection_name())
    }
}

/// A URL-keyed record stored in a [`crate::state::Collection`]
pub trait Record: Serialize + DeserializeOwned {
    const KIND: EntityKind;

    /// Creates a record holding only its identifying URL
    fn stub(url: String) -> Self;

    fn url(&self) -> &str;
}

/// Derives the numeric id from the first run of digits in the URL path
///
/// `https://site/book/show/4671.The_Great_Gatsby` yields `Some(4671)`.
pub fn derive_id(url: &str) -> Option<u64> {
    let parsed = Url::parse(url).ok()?;
    let path = parsed.path();
    let start = path.find(|c: char| c.is_ascii_digit())?;
    let digits: String = path[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}
