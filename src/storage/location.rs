//! Stable record addresses inside the paged table

use serde::{Deserialize, Serialize};
use std::fmt;

/// Address of a record in the table
///
/// Locations are handed out once and never reused or compacted, so indexes
/// can hold them for the lifetime of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Page index within the table
    pub page: u32,
    /// Record index within the page
    pub slot: u32,
}

impl Location {
    /// Create a new location
    pub fn new(page: u32, slot: u32) -> Self {
        Self { page, slot }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Loc(page={}, slot={})", self.page, self.slot)
    }
}
