//! Item store trait

use super::catalog::CatalogStats;
use super::record::ItemRecord;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Outcome of a successful add
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddResult {
    /// Stored codes, uppercased, in request order
    pub codes: Vec<String>,
    pub count: usize,
}

/// Outcome of a search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub items: Vec<ItemRecord>,
}

/// Outcome of a delete
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResult {
    /// Number of live records tombstoned
    pub count: usize,
}

/// Operations the HTTP layer calls into
///
/// Every call is atomic with respect to every other call on the same store.
pub trait ItemStore: Send + Sync {
    /// Store a batch of items, all or nothing
    fn add(&self, items: &[ItemRecord]) -> Result<AddResult>;

    /// Find live items whose name words start with any query word
    fn search(&self, query: &str) -> SearchResult;

    /// Get the live item with a code
    fn fetch(&self, code: &str) -> Result<ItemRecord>;

    /// Tombstone live items by code, silently skipping unknown codes
    fn delete(&self, codes: &[String]) -> DeleteResult;

    /// Snapshot of table and index sizes
    fn stats(&self) -> CatalogStats;
}
