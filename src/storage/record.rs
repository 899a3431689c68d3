//! Item records stored in the paged table

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single catalog item
///
/// Price is kept in minor currency units: $1000.99 is stored as 100099.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub code: String,
    pub name: String,
    pub price: i64,
    /// Tombstone flag, a deleted record stays in its page
    #[serde(skip)]
    deleted: bool,
}

impl ItemRecord {
    /// Create a new live record
    pub fn new(code: impl Into<String>, name: impl Into<String>, price: i64) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            price,
            deleted: false,
        }
    }

    /// Whether this record has been tombstoned
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub(crate) fn mark_deleted(&mut self) {
        self.deleted = true;
    }

    /// Copy of this record in stored form: uppercased code, trimmed name
    pub fn normalized(&self) -> Self {
        Self {
            code: normalize_code(&self.code),
            name: self.name.trim().to_string(),
            price: self.price,
            deleted: false,
        }
    }
}

impl fmt::Display for ItemRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?} ({})", self.code, self.name, self.price)
    }
}

/// Codes are case-insensitive and stored uppercase
pub fn normalize_code(code: &str) -> String {
    code.to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_copy() {
        let input = ItemRecord::new("a12t-4gh7-qpl9-3n4m", "  Green Pepper ", 79);
        let stored = input.normalized();

        assert_eq!(stored.code, "A12T-4GH7-QPL9-3N4M");
        assert_eq!(stored.name, "Green Pepper");
        assert_eq!(stored.price, 79);

        // caller's copy untouched
        assert_eq!(input.code, "a12t-4gh7-qpl9-3n4m");
        assert_eq!(input.name, "  Green Pepper ");
    }

    #[test]
    fn test_tombstone_flag() {
        let mut record = ItemRecord::new("A12T-4GH7-QPL9-3N4M", "Lettuce", 346);
        assert!(!record.is_deleted());

        record.mark_deleted();
        assert!(record.is_deleted());

        // normalizing never carries the tombstone over
        assert!(!record.normalized().is_deleted());
    }
}
