use crate::model::{EntityKind, Record};
use serde::{Deserialize, Serialize};

/// An author record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    url: String,
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rating: String,
    #[serde(default)]
    pub rating_count: String,
    #[serde(default)]
    pub review_count: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub related_author_urls: Vec<String>,
    #[serde(default)]
    pub authored_book_urls: Vec<String>,
}

impl Record for Author {
    const KIND: EntityKind = EntityKind::Authors;

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
