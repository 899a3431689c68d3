//! Paged record table
//!
//! Records live in fixed-capacity pages instead of one large vector, so
//! growing the table never moves existing records and never reallocates a
//! huge block:
//!
//! ```text
//! PagedTable
//!   ├─→ Page 0 [rec, rec, rec, ... rec]   (full, capacity records)
//!   ├─→ Page 1 [rec, rec, rec, ... rec]   (full)
//!   └─→ Page 2 [rec, rec]                 ← appends go here
//! ```
//!
//! Deletion only flips the tombstone flag on a record. Nothing is removed
//! or compacted, so a `Location` stays valid for the table's lifetime.
//!
//! Not thread-safe on its own; the catalog serializes access.

use super::location::Location;
use super::record::ItemRecord;
use tracing::trace;

/// Default number of records per page
pub const DEFAULT_PAGE_CAPACITY: usize = 1024;
/// Default number of page slots reserved up front
pub const DEFAULT_INITIAL_PAGES: usize = 1024;

#[derive(Debug)]
struct Page {
    records: Vec<ItemRecord>,
}

impl Page {
    fn new(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
        }
    }
}

/// Append-only table of item records organized into pages
#[derive(Debug)]
pub struct PagedTable {
    pages: Vec<Page>,
    page_capacity: usize,
    tombstones: usize,
}

impl PagedTable {
    /// Create a table with the default page capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_PAGE_CAPACITY, DEFAULT_INITIAL_PAGES)
    }

    /// Create a table with custom page sizing
    ///
    /// # Arguments
    /// * `page_capacity` - Records per page (clamped to at least 1)
    /// * `initial_pages` - Page slots to reserve before the first append
    pub fn with_capacity(page_capacity: usize, initial_pages: usize) -> Self {
        Self {
            pages: Vec::with_capacity(initial_pages),
            page_capacity: page_capacity.max(1),
            tombstones: 0,
        }
    }

    /// Store a record at the end of the last page
    ///
    /// A new page is allocated first when the last one is full.
    pub fn append(&mut self, record: ItemRecord) -> Location {
        let needs_page = self
            .pages
            .last()
            .map_or(true, |page| page.records.len() >= self.page_capacity);

        if needs_page {
            self.pages.push(Page::new(self.page_capacity));
            trace!(pages = self.pages.len(), "Allocated table page");
        }

        let page_index = self.pages.len() - 1;
        let page = &mut self.pages[page_index];
        let slot = page.records.len();
        page.records.push(record);

        Location::new(page_index as u32, slot as u32)
    }

    /// Read the record at a location
    ///
    /// Locations are only produced by `append`, so an unknown location
    /// yields `None` rather than a panic.
    pub fn get(&self, location: Location) -> Option<&ItemRecord> {
        self.pages
            .get(location.page as usize)
            .and_then(|page| page.records.get(location.slot as usize))
    }

    /// Set the tombstone flag in place
    ///
    /// Returns whether a live record was tombstoned; deleting twice is a no-op.
    pub fn mark_deleted(&mut self, location: Location) -> bool {
        let record = self
            .pages
            .get_mut(location.page as usize)
            .and_then(|page| page.records.get_mut(location.slot as usize));

        match record {
            Some(record) if !record.is_deleted() => {
                record.mark_deleted();
                self.tombstones += 1;
                true
            }
            _ => false,
        }
    }

    /// Records per page
    pub fn page_capacity(&self) -> usize {
        self.page_capacity
    }

    /// Number of allocated pages
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Total number of stored records, tombstoned included
    pub fn len(&self) -> usize {
        self.pages.iter().map(|page| page.records.len()).sum()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Number of tombstoned records
    pub fn tombstone_count(&self) -> usize {
        self.tombstones
    }
}

impl Default for PagedTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(n: usize) -> ItemRecord {
        ItemRecord::new(format!("AAAA-BBBB-CCCC-{:04}", n), "Apple", n as i64)
    }

    #[test]
    fn test_append_fills_pages_in_order() {
        let mut table = PagedTable::with_capacity(2, 4);
        assert!(table.is_empty());

        assert_eq!(table.append(record(0)), Location::new(0, 0));
        assert_eq!(table.append(record(1)), Location::new(0, 1));
        // Third record spills into a new page
        assert_eq!(table.append(record(2)), Location::new(1, 0));

        assert_eq!(table.page_count(), 2);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_get_by_location() {
        let mut table = PagedTable::with_capacity(2, 1);
        let locations: Vec<_> = (0..5).map(|n| table.append(record(n))).collect();

        for (n, loc) in locations.iter().enumerate() {
            assert_eq!(table.get(*loc).map(|r| r.price), Some(n as i64));
        }
        assert!(table.get(Location::new(7, 0)).is_none());
        assert!(table.get(Location::new(0, 9)).is_none());
    }

    #[test]
    fn test_mark_deleted_is_idempotent() {
        let mut table = PagedTable::new();
        let loc = table.append(record(1));

        assert!(table.mark_deleted(loc));
        assert!(!table.mark_deleted(loc));
        assert_eq!(table.tombstone_count(), 1);

        // Record is still physically stored
        let stored = table.get(loc).map(|r| r.is_deleted());
        assert_eq!(stored, Some(true));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let mut table = PagedTable::with_capacity(0, 0);
        assert_eq!(table.page_capacity(), 1);
        table.append(record(0));
        table.append(record(1));
        assert_eq!(table.page_count(), 2);
    }
}
