//! Storage layer
//!
//! # Architecture
//!
//! ```text
//! Catalog (one mutex around everything below)
//!   ├─→ Validator     (pure functions, outside the lock)
//!   ├─→ PagedTable    Page 0 [rec ... rec] → Page 1 [rec ... rec] → ...
//!   ├─→ CodeIndex     code → [Location, ...]
//!   └─→ NameIndex     word prefix → [Location, ...]
//! ```
//!
//! Records are appended to fixed-capacity pages and addressed by a stable
//! `(page, slot)` location. Deleting a record only sets its tombstone flag;
//! index entries are kept and filtered on read.
//!
//! The table and indexes are not thread-safe on their own. `Catalog` is the
//! only synchronization boundary and the only type the HTTP layer needs,
//! through the `ItemStore` trait.

pub mod catalog;
pub mod engine;
pub mod fixtures;
pub mod index;
pub mod location;
pub mod record;
pub mod table;
pub mod validate;

pub use catalog::{Catalog, CatalogStats, CodeReusePolicy};
pub use engine::{AddResult, DeleteResult, ItemStore, SearchResult};
pub use index::{AllPrefixesIndex, CodeIndex, NameIndex, NameIndexKind, SortedWordsIndex};
pub use location::Location;
pub use record::ItemRecord;
pub use table::PagedTable;
pub use validate::{validate_add_batch, validate_code, validate_name};
