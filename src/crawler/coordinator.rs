//! Crawler coordinator - traversal orchestration
//!
//! This module contains the two bounded traversals (books, then authors)
//! that walk the shared record store in discovery order:
//! - Fetching and extracting each pending record's page
//! - Registering every outbound reference as a pending stub
//! - Optionally persisting each visited record immediately

use crate::config::CrawlOptions;
use crate::crawler::extract::{parse_author_page, parse_book_page, parse_related_authors};
use crate::crawler::links::canonical_seed;
use crate::crawler::Fetcher;
use crate::model::{derive_id, EntityKind, Record};
use crate::output::{CrawlReport, TraversalStats};
use crate::state::{RecordStore, VisitState};
use crate::storage::DocumentSink;
use crate::Result;
use chrono::Utc;
use std::time::Instant;
use url::Url;

/// Drives a crawl run over its own record store
///
/// With a sink attached the crawler runs in real-time mode: each record is
/// written right after its visit. Without one, records only live in the
/// store until the caller exports them.
pub struct Crawler {
    fetcher: Fetcher,
    store: RecordStore,
    sink: Option<Box<dyn DocumentSink>>,
}

impl Crawler {
    pub fn new(fetcher: Fetcher) -> Self {
        Self {
            fetcher,
            store: RecordStore::new(),
            sink: None,
        }
    }

    /// Attaches a sink for real-time persistence
    pub fn with_sink(mut self, sink: Box<dyn DocumentSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn is_real_time(&self) -> bool {
        self.sink.is_some()
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn into_store(self) -> RecordStore {
        self.store
    }

    /// Runs the book traversal from the seed, then the author traversal
    pub async fn run(&mut self, options: &CrawlOptions) -> Result<CrawlReport> {
        let started_at = Utc::now();
        let start_time = Instant::now();

        tracing::info!(
            "Starting crawl: {} books, {} authors from {} ({})",
            options.book_count,
            options.author_count,
            options.seed_url,
            if self.is_real_time() {
                "real-time"
            } else {
                "deferred"
            }
        );

        let books = self
            .crawl_books(&options.seed_url, options.book_count)
            .await?;
        let authors = self.crawl_authors(options.author_count).await;

        let report = CrawlReport::new(
            started_at,
            start_time.elapsed(),
            books,
            authors,
            &self.store,
        );

        tracing::info!(
            "Crawl completed: {} books and {} authors visited in {:?} ({} books, {} authors known)",
            report.books.visited,
            report.authors.visited,
            report.duration,
            report.books_known,
            report.authors_known
        );

        Ok(report)
    }

    /// Visits up to `count` books, starting at the seed
    ///
    /// The seed is registered first; every later position is a book
    /// discovered by an earlier visit. A failed visit still counts toward
    /// `count`.
    pub async fn crawl_books(&mut self, seed_url: &str, count: usize) -> Result<TraversalStats> {
        let seed = canonical_seed(seed_url)?;
        let (start, _) = self.store.books.register(&seed);

        let mut stats = TraversalStats::new(count);
        let mut position = start;

        while stats.visited < count {
            if position >= self.store.books.len() {
                tracing::info!(
                    "No more books to visit after {} of {} requested",
                    stats.visited,
                    count
                );
                stats.exhausted = true;
                break;
            }

            self.visit_book(position, &mut stats).await;
            position += 1;

            log_progress(EntityKind::Books, &stats, self.store.books.len() - position);
        }

        Ok(stats)
    }

    /// Visits up to `count` authors in discovery order
    ///
    /// There is no author seed: the traversal walks the authors registered
    /// by book visits and by its own earlier visits.
    pub async fn crawl_authors(&mut self, count: usize) -> TraversalStats {
        let mut stats = TraversalStats::new(count);
        let mut position = 0;

        while stats.visited < count {
            if position >= self.store.authors.len() {
                tracing::info!(
                    "No more authors to visit after {} of {} requested",
                    stats.visited,
                    count
                );
                stats.exhausted = true;
                break;
            }

            self.visit_author(position, &mut stats).await;
            position += 1;

            log_progress(
                EntityKind::Authors,
                &stats,
                self.store.authors.len() - position,
            );
        }

        stats
    }

    /// Visits the book at `position`, returning the visit outcome
    ///
    /// Visiting a record again overwrites its fields in place.
    pub async fn visit_book(&mut self, position: usize, stats: &mut TraversalStats) -> VisitState {
        let Some(url) = self.store.books.get(position).map(|b| b.url().to_string()) else {
            return VisitState::Pending;
        };
        stats.visited += 1;
        tracing::debug!("Visiting book #{}: {}", position, url);

        let Some(html) = self.fetch_record_page(&url).await else {
            stats.fetch_failed += 1;
            self.store.books.mark(position, VisitState::FetchFailed);
            return VisitState::FetchFailed;
        };
        let Ok(base) = Url::parse(&url) else {
            stats.fetch_failed += 1;
            self.store.books.mark(position, VisitState::FetchFailed);
            return VisitState::FetchFailed;
        };

        let page = parse_book_page(&html, &base);
        let (author_urls, similar_urls) = {
            let book = self.store.books.get_or_create_stub(&url);
            book.id = derive_id(&url);
            page.write_into(book, &url);
            (book.author_urls.clone(), book.similar_book_urls.clone())
        };

        let new_books = register_all(&mut self.store, EntityKind::Books, &similar_urls);
        let new_authors = register_all(&mut self.store, EntityKind::Authors, &author_urls);
        self.store.books.mark(position, VisitState::Visited);

        tracing::debug!(
            "Book {}: {} new books, {} new authors",
            url,
            new_books,
            new_authors
        );

        if let Some(book) = self.store.books.get(position) {
            let document = serde_json::to_value(book);
            self.persist(EntityKind::Books, &url, document, stats);
        }

        VisitState::Visited
    }

    /// Visits the author at `position`, returning the visit outcome
    ///
    /// The author's similar-authors page is fetched as part of the same
    /// visit; if that fetch fails only `related_author_urls` is left empty.
    pub async fn visit_author(
        &mut self,
        position: usize,
        stats: &mut TraversalStats,
    ) -> VisitState {
        let Some(url) = self.store.authors.get(position).map(|a| a.url().to_string()) else {
            return VisitState::Pending;
        };
        stats.visited += 1;
        tracing::debug!("Visiting author #{}: {}", position, url);

        let Some(html) = self.fetch_record_page(&url).await else {
            stats.fetch_failed += 1;
            self.store.authors.mark(position, VisitState::FetchFailed);
            return VisitState::FetchFailed;
        };
        let Ok(base) = Url::parse(&url) else {
            stats.fetch_failed += 1;
            self.store.authors.mark(position, VisitState::FetchFailed);
            return VisitState::FetchFailed;
        };

        let mut page = parse_author_page(&html, &base);
        if let Some(similar_url) = page.similar_authors_url.clone() {
            page.related_author_urls = self
                .fetch_related_authors(&similar_url)
                .await
                .map(|urls| urls.into_iter().filter(|u| *u != url).collect());
        }

        let (related_urls, book_urls) = {
            let author = self.store.authors.get_or_create_stub(&url);
            author.id = derive_id(&url);
            page.write_into(author, &url);
            (
                author.related_author_urls.clone(),
                author.authored_book_urls.clone(),
            )
        };

        let new_authors = register_all(&mut self.store, EntityKind::Authors, &related_urls);
        let new_books = register_all(&mut self.store, EntityKind::Books, &book_urls);
        self.store.authors.mark(position, VisitState::Visited);

        tracing::debug!(
            "Author {}: {} new authors, {} new books",
            url,
            new_authors,
            new_books
        );

        if let Some(author) = self.store.authors.get(position) {
            let document = serde_json::to_value(author);
            self.persist(EntityKind::Authors, &url, document, stats);
        }

        VisitState::Visited
    }

    async fn fetch_record_page(&self, url: &str) -> Option<String> {
        match self.fetcher.fetch_page(url).await {
            Ok(html) => Some(html),
            Err(e) => {
                tracing::warn!("Skipping {}: {}", url, e);
                None
            }
        }
    }

    async fn fetch_related_authors(&self, similar_url: &str) -> Option<Vec<String>> {
        let base = Url::parse(similar_url).ok()?;
        match self.fetcher.fetch_page(similar_url).await {
            Ok(html) => parse_related_authors(&html, &base),
            Err(e) => {
                tracing::warn!("Could not load similar authors page: {}", e);
                None
            }
        }
    }

    /// Writes a visited record to the real-time sink, if one is attached
    ///
    /// Failures are logged; the traversal carries on.
    fn persist(
        &mut self,
        kind: EntityKind,
        url: &str,
        document: serde_json::Result<serde_json::Value>,
        stats: &mut TraversalStats,
    ) {
        let Some(sink) = self.sink.as_mut() else {
            return;
        };

        let result = document
            .map_err(crate::storage::StorageError::from)
            .and_then(|doc| sink.insert_one(kind.collection_name(), &doc));

        match result {
            Ok(true) => stats.persisted += 1,
            Ok(false) => tracing::debug!("Sink ignored {} record {}", kind, url),
            Err(e) => tracing::error!("Failed to persist {} record {}: {}", kind, url, e),
        }
    }
}

/// Registers every URL as a pending record of `kind`, returning how many were new
fn register_all(store: &mut RecordStore, kind: EntityKind, urls: &[String]) -> usize {
    urls.iter().filter(|url| store.register(kind, url)).count()
}

fn log_progress(kind: EntityKind, stats: &TraversalStats, pending: usize) {
    if stats.visited % 10 == 0 {
        tracing::info!(
            "Progress: {} of {} {} visited, {} pending",
            stats.visited,
            stats.requested,
            kind,
            pending
        );
    }
}
