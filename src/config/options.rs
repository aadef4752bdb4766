//! Per-run crawl options

use crate::ConfigError;
use url::Url;

/// What a single crawl run should fetch
///
/// This is the whole caller-facing contract of the crawl driver: how many
/// books and authors to visit, where to start, and whether records are
/// persisted as they are visited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlOptions {
    /// Number of book pages to visit
    pub book_count: usize,

    /// Number of author pages to visit
    pub author_count: usize,

    /// Book page the book traversal starts from
    pub seed_url: String,

    /// Persist each record right after its visit instead of exporting at the end
    pub real_time: bool,
}

impl CrawlOptions {
    pub fn new(book_count: usize, author_count: usize, seed_url: impl Into<String>) -> Self {
        Self {
            book_count,
            author_count,
            seed_url: seed_url.into(),
            real_time: false,
        }
    }

    pub fn real_time(mut self, real_time: bool) -> Self {
        self.real_time = real_time;
        self
    }

    /// Checks that the seed is an absolute http(s) URL
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.seed_url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", self.seed_url, e))
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "Seed URL '{}' must use http or https",
                self.seed_url
            )));
        }

        Ok(())
    }
}
