//! State module for tracking crawl progress
//!
//! This module holds the in-memory crawl state: every discovered book and
//! author, keyed by URL, and where each one stands in its traversal.
//!
//! # Components
//!
//! - `VisitState`: Pending / Visited / FetchFailed per record
//! - `Collection`: URL-indexed, discovery-ordered records of one entity type
//! - `RecordStore`: the book and author collections shared by both traversals

mod collection;
mod record_store;
mod visit_state;

// Re-export main types
pub use collection::Collection;
pub use record_store::RecordStore;
pub use visit_state::VisitState;
