//! Application configuration
//!
//! Settings are layered, later sources winning:
//!
//! ```text
//! defaults → TOML file (--config) → ITEMSTORE_* environment → CLI flags
//! ```
//!
//! Nested keys use a double underscore in the environment, e.g.
//! `ITEMSTORE_SERVER__HTTP_PORT=9000` or `ITEMSTORE_STORAGE__PAGE_CAPACITY=4096`.

use crate::error::{Error, Result};
use crate::storage::index::NameIndexKind;
use crate::storage::table::{DEFAULT_INITIAL_PAGES, DEFAULT_PAGE_CAPACITY};
use crate::storage::{CodeReusePolicy, ItemRecord};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "ITEMSTORE";

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server bind address
    #[serde(default = "default_http_addr")]
    pub http_addr: String,
    /// HTTP port
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Enable CORS
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,
    /// Maximum request body size (bytes)
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
    /// Request timeout (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_http_addr() -> String {
    "127.0.0.1".to_string()
}

fn default_http_port() -> u16 {
    8080
}

fn default_enable_cors() -> bool {
    true
}

fn default_max_body_size() -> usize {
    10 * 1024 * 1024 // 10MB
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: default_http_addr(),
            http_port: default_http_port(),
            enable_cors: default_enable_cors(),
            max_body_size: default_max_body_size(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Catalog storage configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Records per table page
    #[serde(default = "default_page_capacity")]
    pub page_capacity: usize,
    /// Page slots reserved at startup
    #[serde(default = "default_initial_pages")]
    pub initial_pages: usize,
    /// Whether a deleted code may be added again
    #[serde(default)]
    pub code_reuse: CodeReusePolicy,
    /// Name search index implementation
    #[serde(default)]
    pub name_index: NameIndexKind,
    /// Load the built-in sample items at startup
    #[serde(default)]
    pub seed_fixtures: bool,
    /// Extra items loaded at startup, prices in minor units
    #[serde(default)]
    pub fixtures: Vec<ItemRecord>,
}

fn default_page_capacity() -> usize {
    DEFAULT_PAGE_CAPACITY
}

fn default_initial_pages() -> usize {
    DEFAULT_INITIAL_PAGES
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            page_capacity: default_page_capacity(),
            initial_pages: default_initial_pages(),
            code_reuse: CodeReusePolicy::default(),
            name_index: NameIndexKind::default(),
            seed_fixtures: false,
            fixtures: Vec::new(),
        }
    }
}

impl StorageConfig {
    /// Reject settings the catalog cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.page_capacity == 0 {
            return Err(Error::Config("page_capacity must be at least 1".to_string()));
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load configuration from an optional TOML file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(true),
            );
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| Error::Config(format!("Failed to load configuration: {}", e)))?;

        let config: AppConfig = settings
            .try_deserialize()
            .map_err(|e| Error::Config(format!("Invalid configuration: {}", e)))?;

        config.storage.validate()?;
        Ok(config)
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to render configuration: {}", e)))
    }
}
