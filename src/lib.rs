// ItemStore - in-memory item catalog
// Paged record table with code and name-prefix indexes

#![warn(rust_2018_idioms)]

pub mod config;
pub mod metrics;
pub mod server;
pub mod storage;

// Re-exports for convenience
pub use crate::config::AppConfig;
pub use storage::{Catalog, CatalogStats, CodeReusePolicy, ItemRecord, ItemStore};

/// ItemStore error types
pub mod error {
    use thiserror::Error;

    /// Item code syntax violations
    #[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
    pub enum CodeError {
        #[error("code, wrong length")]
        WrongLength,

        #[error("code, wrong parts number")]
        WrongPartCount,

        #[error("code, one of part has wrong length")]
        PartWrongLength,

        #[error("code, one of part not alphanumeric")]
        PartNotAlphanumeric,
    }

    /// Item name syntax violations
    #[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
    pub enum NameError {
        #[error("name, one of part not alphanumeric")]
        PartNotAlphanumeric,
    }

    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum Error {
        #[error("Invalid item code: {0}")]
        Code(#[from] CodeError),

        #[error("Invalid item name: {0}")]
        Name(#[from] NameError),

        #[error("Duplicated code in add request: {code}")]
        DuplicateCodeInBatch { code: String },

        #[error("Code already stored: {code}")]
        DuplicateAgainstStore { code: String },

        #[error("Item not found: {code}")]
        NotFound { code: String },

        #[error("Configuration error: {0}")]
        Config(String),
    }

    impl Error {
        /// Whether the error was caused by the shape or content of the caller's input
        pub fn is_invalid_input(&self) -> bool {
            matches!(
                self,
                Error::Code(_)
                    | Error::Name(_)
                    | Error::DuplicateCodeInBatch { .. }
                    | Error::DuplicateAgainstStore { .. }
            )
        }
    }

    pub type Result<T> = std::result::Result<T, Error>;
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
