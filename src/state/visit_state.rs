/// Visit state definitions for tracking crawl progress
use std::fmt;

/// Represents where a record stands in its traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VisitState {
    /// URL is known (a stub or the seed) but its page has not been visited
    #[default]
    Pending,

    /// Page was fetched and its fields written into the record
    Visited,

    /// Page fetch failed; the record keeps whatever it held before the visit
    FetchFailed,
}

impl VisitState {
    /// Returns true once the traversal has processed this record
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Visited => "visited",
            Self::FetchFailed => "fetch_failed",
        };
        f.write_str(name)
    }
}
