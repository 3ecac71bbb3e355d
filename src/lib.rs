//! Classifind: an incremental classifieds crawler
//!
//! This crate pages through the search results of a single marketplace site,
//! parses listing blocks into [`Item`] records, keeps only the ones it has not
//! seen before, persists them to SQLite and downloads their photos.

pub mod config;
pub mod crawler;
pub mod fetcher;
pub mod item;
pub mod output;
pub mod site;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for Classifind operations
#[derive(Debug, Error)]
pub enum ClassifindError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] fetcher::FetchError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Photo download failed for {url}: HTTP {status}")]
    PhotoStatus { url: String, status: u16 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors reported by the marketplace for a single search page
///
/// These never abort a crawl session: the page that produced one contributes
/// no items and the crawl moves on to the next (query, category) pair.
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("site_returned_{status}")]
    Status { status: u16 },

    #[error("query_correction")]
    QueryCorrected,

    #[error("transport error for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("cannot build request URL: {0}")]
    InvalidUrl(#[from] ::url::ParseError),
}

/// Result type alias for Classifind operations
pub type Result<T> = std::result::Result<T, ClassifindError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlParams, CrawlSession};
pub use item::{hash_item, Item, PriceRange};
pub use state::KnownItems;
