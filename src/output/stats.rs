//! Crawl statistics
//!
//! This module collects per-traversal counters during a crawl and
//! prints the end-of-run summary.

use crate::model::EntityKind;
use crate::state::{RecordStore, VisitState};
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Counters for one traversal (books or authors)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TraversalStats {
    /// How many visits the caller asked for
    pub requested: usize,

    /// Pages visited, successful or not
    pub visited: usize,

    /// Visits whose page fetch failed
    pub fetch_failed: usize,

    /// Records written to the sink
    pub persisted: usize,

    /// True if the pending list ran out before `requested` was reached
    pub exhausted: bool,
}

impl TraversalStats {
    pub fn new(requested: usize) -> Self {
        Self {
            requested,
            ..Self::default()
        }
    }

    pub fn succeeded(&self) -> usize {
        self.visited - self.fetch_failed
    }
}

/// Summary of a complete crawl run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub started_at: DateTime<Utc>,
    pub duration: Duration,
    pub books: TraversalStats,
    pub authors: TraversalStats,

    /// Records known at the end of the run, stubs included
    pub books_known: usize,
    pub authors_known: usize,

    /// Records discovered but never visited
    pub books_pending: usize,
    pub authors_pending: usize,
}

impl CrawlReport {
    /// Builds a report from traversal counters and the final store contents
    pub fn new(
        started_at: DateTime<Utc>,
        duration: Duration,
        books: TraversalStats,
        authors: TraversalStats,
        store: &RecordStore,
    ) -> Self {
        Self {
            started_at,
            duration,
            books,
            authors,
            books_known: store.len(EntityKind::Books),
            authors_known: store.len(EntityKind::Authors),
            books_pending: store.books.count_in_state(VisitState::Pending),
            authors_pending: store.authors.count_in_state(VisitState::Pending),
        }
    }

    pub fn stats(&self, kind: EntityKind) -> &TraversalStats {
        match kind {
            EntityKind::Books => &self.books,
            EntityKind::Authors => &self.authors,
        }
    }
}

/// Prints the report to stdout in a formatted manner
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Summary ===\n");
    println!("Started: {}", report.started_at.to_rfc3339());
    println!("Duration: {:.1}s", report.duration.as_secs_f64());
    println!();

    for (kind, known, pending) in [
        (EntityKind::Books, report.books_known, report.books_pending),
        (EntityKind::Authors, report.authors_known, report.authors_pending),
    ] {
        let stats = report.stats(kind);
        println!("{}:", capitalize(kind.collection_name()));
        println!("  Requested: {}", stats.requested);
        println!(
            "  Visited: {} ({} ok, {} fetch failures)",
            stats.visited,
            stats.succeeded(),
            stats.fetch_failed
        );
        println!("  Known: {} ({} never visited)", known, pending);
        println!("  Persisted: {}", stats.persisted);
        if stats.exhausted {
            println!("  Ran out of {} to visit before the requested count", kind);
        }
        println!();
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
