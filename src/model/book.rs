use crate::model::{EntityKind, Record};
use serde::{Deserialize, Serialize};

/// A book record
///
/// `author_names` and `author_urls` are index-aligned: entry `i` of one
/// describes the same author as entry `i` of the other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    url: String,
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub rating: String,
    #[serde(default)]
    pub rating_count: String,
    #[serde(default)]
    pub review_count: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub author_names: Vec<String>,
    #[serde(default)]
    pub author_urls: Vec<String>,
    #[serde(default)]
    pub similar_book_urls: Vec<String>,
}

impl Record for Book {
    const KIND: EntityKind = EntityKind::Books;

    fn stub(url: String) -> Self {
        Self {
            url,
            ..Self::default()
        }
    }

    fn url(&self) -> &str {
        &self.url
    }
}
