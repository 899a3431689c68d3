//! Catalog engine
//!
//! Composes the validator, the paged table and both indexes behind a single
//! mutex. The table and indexes are one unit: every operation holds the lock
//! for its full duration, so operations are linearizable in lock order and
//! no reader ever sees a half-applied add.
//!
//! ```text
//! add(items) ──validate──▶ lock ──▶ duplicate check ──▶ append + index ──▶ unlock
//! search(q)  ─────────────▶ lock ──▶ name index scan per token ───────────▶ unlock
//! fetch(c)   ─────────────▶ lock ──▶ code index → table ─────────────────▶ unlock
//! delete(cs) ─────────────▶ lock ──▶ code index → tombstone ─────────────▶ unlock
//! ```

use super::engine::{AddResult, DeleteResult, ItemStore, SearchResult};
use super::fixtures::sample_items;
use super::index::{CodeIndex, NameIndex};
use super::record::{normalize_code, ItemRecord};
use super::table::PagedTable;
use super::validate::validate_add_batch;
use crate::config::StorageConfig;
use crate::error::{Error, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

/// Whether a code that belonged to a deleted record may be added again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeReusePolicy {
    /// Only live records block a code
    #[default]
    AllowAfterDelete,
    /// Any indexed entry blocks a code, tombstoned ones included
    Forbid,
}

/// Table and index sizes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub pages: usize,
    pub page_capacity: usize,
    pub records: usize,
    pub live_records: usize,
    pub tombstoned_records: usize,
    pub code_keys: usize,
    pub name_keys: usize,
}

#[derive(Debug)]
struct CatalogState {
    table: PagedTable,
    codes: CodeIndex,
    names: Box<dyn NameIndex>,
}

impl CatalogState {
    fn code_taken(&self, code: &str, policy: CodeReusePolicy) -> bool {
        match policy {
            CodeReusePolicy::AllowAfterDelete => {
                self.codes.active_location(code, &self.table).is_some()
            }
            CodeReusePolicy::Forbid => self.codes.is_indexed(code),
        }
    }

    fn insert(&mut self, record: ItemRecord) {
        let code = record.code.clone();
        let name = record.name.clone();
        let location = self.table.append(record);
        self.codes.insert(&code, location);
        self.names.insert(&name, location);
    }
}

/// In-memory item catalog
///
/// Owns its table and indexes exclusively. Share it between workers with
/// `Arc<Catalog>`.
#[derive(Debug)]
pub struct Catalog {
    state: Mutex<CatalogState>,
    code_reuse: CodeReusePolicy,
}

impl Catalog {
    /// Create an empty catalog with default settings
    pub fn new() -> Self {
        Self::build(&StorageConfig::default())
    }

    /// Create a catalog with a specific code reuse policy
    pub fn with_policy(code_reuse: CodeReusePolicy) -> Self {
        Self::build(&StorageConfig {
            code_reuse,
            ..StorageConfig::default()
        })
    }

    /// Create a catalog from configuration and load its fixtures
    ///
    /// Fixtures go through the regular add path; an invalid fixture set
    /// fails construction.
    pub fn with_config(config: &StorageConfig) -> Result<Self> {
        config.validate()?;
        let catalog = Self::build(config);

        if config.seed_fixtures {
            let seeded = catalog.add(&sample_items())?;
            info!(count = seeded.count, "Seeded sample items");
        }
        if !config.fixtures.is_empty() {
            let loaded = catalog.add(&config.fixtures)?;
            info!(count = loaded.count, "Loaded configured fixtures");
        }

        Ok(catalog)
    }

    fn build(config: &StorageConfig) -> Self {
        Self {
            state: Mutex::new(CatalogState {
                table: PagedTable::with_capacity(config.page_capacity, config.initial_pages),
                codes: CodeIndex::new(),
                names: config.name_index.build(),
            }),
            code_reuse: config.code_reuse,
        }
    }

    /// Active code reuse policy
    pub fn code_reuse(&self) -> CodeReusePolicy {
        self.code_reuse
    }

    /// Add a batch of items
    ///
    /// The whole batch is rejected on the first invalid item, on a repeated
    /// code within the batch, or on a code already held by the store.
    pub fn add(&self, items: &[ItemRecord]) -> Result<AddResult> {
        validate_add_batch(items)?;
        let records: Vec<ItemRecord> = items.iter().map(ItemRecord::normalized).collect();

        let mut state = self.state.lock();

        if let Some(taken) = records
            .iter()
            .find(|record| state.code_taken(&record.code, self.code_reuse))
        {
            return Err(Error::DuplicateAgainstStore {
                code: taken.code.clone(),
            });
        }

        let codes: Vec<String> = records.iter().map(|r| r.code.clone()).collect();
        for record in records {
            state.insert(record);
        }

        debug!(count = codes.len(), records = state.table.len(), "Added items");
        Ok(AddResult {
            count: codes.len(),
            codes,
        })
    }

    /// Search live items by name word prefixes
    ///
    /// Each whitespace-separated query word is looked up on its own. Results
    /// keep first-seen order and appear once per code.
    pub fn search(&self, query: &str) -> SearchResult {
        let tokens: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
        if tokens.is_empty() {
            return SearchResult::default();
        }

        let state = self.state.lock();

        let mut seen = HashSet::new();
        let mut items = Vec::new();
        for token in &tokens {
            for record in state.names.lookup_prefix(token, &state.table) {
                if seen.insert(record.code.clone()) {
                    items.push(record);
                }
            }
        }

        debug!(tokens = tokens.len(), found = items.len(), "Searched items");
        SearchResult { items }
    }

    /// Fetch the live item with a code, case-insensitive
    pub fn fetch(&self, code: &str) -> Result<ItemRecord> {
        let code = normalize_code(code);
        let state = self.state.lock();

        state
            .codes
            .lookup_active(&code, &state.table)
            .cloned()
            .ok_or(Error::NotFound { code })
    }

    /// Tombstone live items by code
    ///
    /// Codes without a live record are skipped.
    pub fn delete(&self, codes: &[String]) -> DeleteResult {
        let mut state = self.state.lock();
        let CatalogState { table, codes: index, .. } = &mut *state;

        let count = codes
            .iter()
            .map(|code| normalize_code(code))
            .filter(|code| index.delete_by_code(code, table))
            .count();

        debug!(requested = codes.len(), deleted = count, "Deleted items");
        DeleteResult { count }
    }

    /// Snapshot of table and index sizes
    pub fn stats(&self) -> CatalogStats {
        let state = self.state.lock();
        let records = state.table.len();
        let tombstoned = state.table.tombstone_count();

        CatalogStats {
            pages: state.table.page_count(),
            page_capacity: state.table.page_capacity(),
            records,
            live_records: records - tombstoned,
            tombstoned_records: tombstoned,
            code_keys: state.codes.key_count(),
            name_keys: state.names.key_count(),
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemStore for Catalog {
    fn add(&self, items: &[ItemRecord]) -> Result<AddResult> {
        Catalog::add(self, items)
    }

    fn search(&self, query: &str) -> SearchResult {
        Catalog::search(self, query)
    }

    fn fetch(&self, code: &str) -> Result<ItemRecord> {
        Catalog::fetch(self, code)
    }

    fn delete(&self, codes: &[String]) -> DeleteResult {
        Catalog::delete(self, codes)
    }

    fn stats(&self) -> CatalogStats {
        Catalog::stats(self)
    }
}
