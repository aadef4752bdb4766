//! Crawler module for page fetching and traversal
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a configured client
//! - Field and link extraction from book and author pages
//! - The bounded book and author traversals

mod coordinator;
mod extract;
mod fetcher;
mod links;

pub use coordinator::Crawler;
pub use extract::{
    align_authors, parse_author_page, parse_book_page, parse_related_authors, AuthorPage,
    BookPage,
};
pub use fetcher::{build_http_client, FetchError, Fetcher};
pub use links::{canonical_seed, resolve_link};

use crate::config::{validate, Config, CrawlOptions};
use crate::output::{export_store, CrawlReport};
use crate::storage::open_sink;
use crate::Result;
use std::path::Path;

/// Runs a complete crawl operation
///
/// In real-time mode each visited record goes straight to the configured
/// sink. Otherwise the whole store is exported once both traversals finish:
/// interchange files are written to the export directory and then imported
/// into the sink.
pub async fn run_crawl(config: &Config, options: &CrawlOptions) -> Result<CrawlReport> {
    validate(config)?;
    options.validate()?;

    // The sink opens before any page is fetched
    let sink = open_sink(&config.output)?;
    let fetcher = Fetcher::new(config)?;

    let (mut crawler, mut deferred_sink) = if options.real_time {
        (Crawler::new(fetcher).with_sink(sink), None)
    } else {
        (Crawler::new(fetcher), Some(sink))
    };

    let mut report = crawler.run(options).await?;

    if let Some(sink) = deferred_sink.as_mut() {
        let export_dir = Path::new(&config.output.export_dir);
        let (books, authors) = export_store(crawler.store(), export_dir, sink.as_mut())?;

        tracing::info!(
            "Exported {} books and {} authors to {}",
            books,
            authors,
            export_dir.display()
        );
        report.books.persisted = books;
        report.authors.persisted = authors;
    }

    Ok(report)
}
