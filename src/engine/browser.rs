//! Stateful pagination over a record collection.

use crate::engine::types::{RecordCollection, TripRecord};

/// Default number of records revealed per page.
pub const PAGE_SIZE: usize = 5;

/// A one-way cursor over a collection, revealing records in fixed-size
/// pages. Once exhausted it stays exhausted; create a new browser for a
/// new pass.
#[derive(Debug)]
pub struct RecordBrowser<'a> {
    collection: &'a RecordCollection,
    cursor: usize,
}

impl<'a> RecordBrowser<'a> {
    pub fn new(collection: &'a RecordCollection) -> Self {
        RecordBrowser {
            collection,
            cursor: 0,
        }
    }

    /// Returns up to `page_size` records starting at the cursor, in
    /// collection order, and whether the collection is now exhausted.
    /// Calls after exhaustion return an empty page and `true` again.
    pub fn next_page(&mut self, page_size: usize) -> (&'a [TripRecord], bool) {
        let records = &self.collection.records;
        let start = self.cursor.min(records.len());
        let end = (start + page_size).min(records.len());
        self.cursor = end;

        (&records[start..end], self.cursor >= records.len())
    }
}
