//! Discovery-ordered, URL-indexed record collection

use crate::model::Record;
use crate::state::VisitState;
use std::collections::HashMap;

/// Records of one entity type in the order they were discovered
///
/// The URL index guarantees at most one record per URL. Records are never
/// removed, so an index handed out by [`Collection::register`] stays valid
/// for the life of the collection.
#[derive(Debug, Clone)]
pub struct Collection<R> {
    records: Vec<R>,
    states: Vec<VisitState>,
    index: HashMap<String, usize>,
}

impl<R> Default for Collection<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            states: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<R: Record> Collection<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Position of the record with this exact URL
    pub fn position(&self, url: &str) -> Option<usize> {
        self.index.get(url).copied()
    }

    pub fn find_by_url(&self, url: &str) -> Option<&R> {
        self.position(url).map(|i| &self.records[i])
    }

    pub fn contains(&self, url: &str) -> bool {
        self.index.contains_key(url)
    }

    /// Registers `url`, creating a pending stub if it is new
    ///
    /// Returns the record's position and whether it was created by this call.
    /// This is the only path by which records enter the collection.
    pub fn register(&mut self, url: &str) -> (usize, bool) {
        if let Some(position) = self.position(url) {
            return (position, false);
        }

        let position = self.records.len();
        self.records.push(R::stub(url.to_string()));
        self.states.push(VisitState::Pending);
        self.index.insert(url.to_string(), position);
        tracing::trace!("Registered {} stub #{}: {}", R::KIND, position, url);
        (position, true)
    }

    /// Returns the record for `url`, creating a stub if it is not yet known
    pub fn get_or_create_stub(&mut self, url: &str) -> &mut R {
        let (position, _) = self.register(url);
        &mut self.records[position]
    }

    pub fn get(&self, position: usize) -> Option<&R> {
        self.records.get(position)
    }

    pub fn get_mut(&mut self, position: usize) -> Option<&mut R> {
        self.records.get_mut(position)
    }

    pub fn state(&self, position: usize) -> Option<VisitState> {
        self.states.get(position).copied()
    }

    /// Records the outcome of visiting the record at `position`
    pub fn mark(&mut self, position: usize, state: VisitState) {
        if let Some(slot) = self.states.get_mut(position) {
            *slot = state;
        }
    }

    /// All records, in discovery order
    pub fn all(&self) -> &[R] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = (&R, VisitState)> {
        self.records.iter().zip(self.states.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn count_in_state(&self, state: VisitState) -> usize {
        self.states.iter().filter(|s| **s == state).count()
    }
}
