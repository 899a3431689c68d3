//! Secondary indexes over the paged table
//!
//! # Architecture
//!
//! ```text
//! CodeIndex (exact match)
//!   └─→ "A12T-4GH7-QPL9-3N4M" → [Loc(0,0), Loc(3,17)]   ← only the last one counts
//!
//! NameIndex (prefix search, baseline AllPrefixesIndex)
//!   ├─→ "green pepper" → [Loc(0,2)]                      ← full lowercased name
//!   ├─→ "g" / "gr" / "gre" / "gree" / "green" → [Loc(0,2)]
//!   └─→ "p" / "pe" / "pep" / ... / "pepper"   → [Loc(0,2)]
//! ```
//!
//! Both indexes are append-only multimaps. Entries are never removed: a
//! deleted record keeps its index entries and every read filters on the
//! record's current tombstone flag instead. The location lists double as
//! an audit trail of every slot that ever held a key.
//!
//! Nothing here locks; the catalog owns the indexes behind its mutex.

use super::location::Location;
use super::record::ItemRecord;
use super::table::PagedTable;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::ops::Bound;

/// Exact-match index from uppercased code to its location history
#[derive(Debug, Default)]
pub struct CodeIndex {
    entries: HashMap<String, Vec<Location>>,
}

impl CodeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `code` now lives at `location`, keeping older entries
    pub fn insert(&mut self, code: &str, location: Location) {
        self.entries
            .entry(code.to_string())
            .or_default()
            .push(location);
    }

    /// Most recent location registered for a code, live or not
    pub fn last_location(&self, code: &str) -> Option<Location> {
        self.entries.get(code).and_then(|locs| locs.last().copied())
    }

    /// Whether any location, including tombstoned ones, was ever registered
    pub fn is_indexed(&self, code: &str) -> bool {
        self.entries.contains_key(code)
    }

    /// Every location that ever held the code, oldest first
    pub fn history(&self, code: &str) -> &[Location] {
        self.entries.get(code).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Location of the live record for a code
    pub fn active_location(&self, code: &str, table: &PagedTable) -> Option<Location> {
        let location = self.last_location(code)?;
        match table.get(location) {
            Some(record) if !record.is_deleted() => Some(location),
            _ => None,
        }
    }

    /// Live record for a code
    pub fn lookup_active<'t>(&self, code: &str, table: &'t PagedTable) -> Option<&'t ItemRecord> {
        self.active_location(code, table)
            .and_then(|location| table.get(location))
    }

    /// Tombstone the live record for a code
    ///
    /// Returns whether a live record existed. Index entries stay in place.
    pub fn delete_by_code(&self, code: &str, table: &mut PagedTable) -> bool {
        match self.active_location(code, table) {
            Some(location) => table.mark_deleted(location),
            None => false,
        }
    }

    /// Number of distinct codes ever indexed
    pub fn key_count(&self) -> usize {
        self.entries.len()
    }
}

/// Available name index implementations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameIndexKind {
    /// Every prefix of every word stored as its own key
    #[default]
    AllPrefixes,
    /// Ordered word map searched with a range scan
    SortedWords,
}

impl NameIndexKind {
    /// Build an empty index of this kind
    pub fn build(self) -> Box<dyn NameIndex> {
        match self {
            NameIndexKind::AllPrefixes => Box::new(AllPrefixesIndex::new()),
            NameIndexKind::SortedWords => Box::new(SortedWordsIndex::new()),
        }
    }
}

/// Name search index
///
/// A token matches a record when the token equals the record's full
/// lowercased name, or is a prefix of one of its lowercased words.
/// Implementations must return matching locations in ascending order
/// without repeats, so swapping one for another never changes results.
pub trait NameIndex: Send + Sync + fmt::Debug {
    /// Register the name of the record stored at `location`
    fn insert(&mut self, name: &str, location: Location);

    /// Locations registered under a lowercased token, deleted ones included
    fn locations(&self, token: &str) -> Vec<Location>;

    /// Number of keys held by the index
    fn key_count(&self) -> usize;

    /// Live records matching a token
    fn lookup_prefix(&self, token: &str, table: &PagedTable) -> Vec<ItemRecord> {
        self.locations(token)
            .into_iter()
            .filter_map(|location| table.get(location))
            .filter(|record| !record.is_deleted())
            .cloned()
            .collect()
    }
}

fn lowercase_words(name: &str) -> impl Iterator<Item = String> + '_ {
    name.split_whitespace().map(str::to_ascii_lowercase)
}

/// Baseline index: full name plus every prefix of every word as a key
///
/// A word of length L produces L keys, so memory grows quadratically with
/// word length.
#[derive(Debug, Default)]
pub struct AllPrefixesIndex {
    entries: HashMap<String, Vec<Location>>,
}

impl AllPrefixesIndex {
    pub fn new() -> Self {
        Self::default()
    }

    fn keys_for(name: &str) -> BTreeSet<String> {
        let mut keys = BTreeSet::new();

        let full = name.trim().to_ascii_lowercase();
        if !full.is_empty() {
            keys.insert(full);
        }

        for word in lowercase_words(name) {
            // Names are validated ASCII, every char boundary is a byte boundary
            for (end, _) in word.char_indices().skip(1) {
                keys.insert(word[..end].to_string());
            }
            keys.insert(word);
        }
        keys
    }
}

impl NameIndex for AllPrefixesIndex {
    fn insert(&mut self, name: &str, location: Location) {
        for key in Self::keys_for(name) {
            self.entries.entry(key).or_default().push(location);
        }
    }

    fn locations(&self, token: &str) -> Vec<Location> {
        self.entries.get(token).cloned().unwrap_or_default()
    }

    fn key_count(&self) -> usize {
        self.entries.len()
    }
}

/// Ordered index of whole words and full names
///
/// Stores one key per distinct word instead of one per prefix; a prefix
/// lookup scans the range of words starting with the token.
#[derive(Debug, Default)]
pub struct SortedWordsIndex {
    words: BTreeMap<String, Vec<Location>>,
    names: HashMap<String, Vec<Location>>,
}

impl SortedWordsIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NameIndex for SortedWordsIndex {
    fn insert(&mut self, name: &str, location: Location) {
        let full = name.trim().to_ascii_lowercase();
        if !full.is_empty() {
            self.names.entry(full).or_default().push(location);
        }

        let words: BTreeSet<String> = lowercase_words(name).collect();
        for word in words {
            self.words.entry(word).or_default().push(location);
        }
    }

    fn locations(&self, token: &str) -> Vec<Location> {
        if token.is_empty() {
            return Vec::new();
        }

        let mut found: BTreeSet<Location> = self
            .words
            .range::<str, _>((Bound::Included(token), Bound::Unbounded))
            .take_while(|(word, _)| word.starts_with(token))
            .flat_map(|(_, locs)| locs.iter().copied())
            .collect();

        if let Some(locs) = self.names.get(token) {
            found.extend(locs.iter().copied());
        }

        found.into_iter().collect()
    }

    fn key_count(&self) -> usize {
        self.words.len() + self.names.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with(names: &[&str]) -> (PagedTable, Vec<Location>) {
        let mut table = PagedTable::with_capacity(2, 1);
        let locs = names
            .iter()
            .enumerate()
            .map(|(n, name)| {
                table.append(ItemRecord::new(
                    format!("AAAA-BBBB-CCCC-{:04}", n),
                    *name,
                    n as i64,
                ))
            })
            .collect();
        (table, locs)
    }

    #[test]
    fn test_code_index_keeps_history() {
        let mut table = PagedTable::new();
        let mut index = CodeIndex::new();

        let first = table.append(ItemRecord::new("A12T-4GH7-QPL9-3N4M", "Lettuce", 346));
        index.insert("A12T-4GH7-QPL9-3N4M", first);
        assert!(index.delete_by_code("A12T-4GH7-QPL9-3N4M", &mut table));

        let second = table.append(ItemRecord::new("A12T-4GH7-QPL9-3N4M", "Romaine", 400));
        index.insert("A12T-4GH7-QPL9-3N4M", second);

        assert_eq!(index.history("A12T-4GH7-QPL9-3N4M"), &[first, second]);
        let active = index.lookup_active("A12T-4GH7-QPL9-3N4M", &table);
        assert_eq!(active.map(|r| r.name.as_str()), Some("Romaine"));
        assert_eq!(index.key_count(), 1);
    }

    #[test]
    fn test_code_index_filters_tombstones() {
        let mut table = PagedTable::new();
        let mut index = CodeIndex::new();
        let loc = table.append(ItemRecord::new("E5T6-9UI3-TH15-QR88", "Peach", 299));
        index.insert("E5T6-9UI3-TH15-QR88", loc);

        assert!(index.delete_by_code("E5T6-9UI3-TH15-QR88", &mut table));
        assert!(!index.delete_by_code("E5T6-9UI3-TH15-QR88", &mut table));
        assert!(index.lookup_active("E5T6-9UI3-TH15-QR88", &table).is_none());

        // Entry survives deletion
        assert!(index.is_indexed("E5T6-9UI3-TH15-QR88"));
        assert_eq!(index.last_location("E5T6-9UI3-TH15-QR88"), Some(loc));

        assert!(!index.delete_by_code("ZZZZ-ZZZZ-ZZZZ-ZZZZ", &mut table));
    }

    #[test]
    fn test_all_prefixes_keys() {
        let keys = AllPrefixesIndex::keys_for("Green Pepper");
        for key in ["green pepper", "g", "gree", "green", "p", "pepp", "pepper"] {
            assert!(keys.contains(key), "missing key {}", key);
        }
        assert!(!keys.contains("reen"));
        // "green pepper" + 5 + 6
        assert_eq!(keys.len(), 12);
    }

    #[test]
    fn test_all_prefixes_no_repeat_locations() {
        let (table, locs) = table_with(&["Pepper Peppers"]);
        let mut index = AllPrefixesIndex::new();
        index.insert("Pepper Peppers", locs[0]);

        assert_eq!(index.locations("pepper"), vec![locs[0]]);
        assert_eq!(index.lookup_prefix("pepp", &table).len(), 1);
    }

    #[test]
    fn test_lookup_prefix_filters_deleted() {
        let (mut table, locs) = table_with(&["Green Pepper", "Red Pepper"]);
        let mut index = AllPrefixesIndex::new();
        index.insert("Green Pepper", locs[0]);
        index.insert("Red Pepper", locs[1]);

        assert_eq!(index.lookup_prefix("pepp", &table).len(), 2);

        table.mark_deleted(locs[0]);
        let found = index.lookup_prefix("pepp", &table);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Red Pepper");

        // Deleted location still registered
        assert_eq!(index.locations("pepp"), vec![locs[0], locs[1]]);
    }

    #[test]
    fn test_indexes_agree() {
        let names = [
            "Green Pepper",
            "Gala Apple",
            "Lettuce",
            "Peach",
            "Pepper Peppers",
            "Grapefruit",
            "",
        ];
        let (table, locs) = table_with(&names);

        let mut baseline = NameIndexKind::AllPrefixes.build();
        let mut sorted = NameIndexKind::SortedWords.build();
        for (name, loc) in names.iter().zip(&locs) {
            baseline.insert(name, *loc);
            sorted.insert(name, *loc);
        }

        for token in [
            "g", "gr", "green", "green pepper", "pe", "pep", "peppers", "lettuce", "a", "zzz",
            "apple", "",
        ] {
            assert_eq!(
                baseline.locations(token),
                sorted.locations(token),
                "token {:?}",
                token
            );
            assert_eq!(
                baseline.lookup_prefix(token, &table),
                sorted.lookup_prefix(token, &table)
            );
        }
        assert!(sorted.key_count() < baseline.key_count());
    }
}
