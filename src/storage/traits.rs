//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::item::Item;
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error for item {hash}: {source}")]
    Serialization {
        hash: String,
        source: serde_json::Error,
    },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Durable hash -> item store with insert-if-absent semantics
pub trait ItemStore {
    /// Returns true if an item with this hash has been stored
    fn contains(&self, hash: &str) -> StorageResult<bool>;

    /// Inserts every record whose hash is not stored yet
    ///
    /// All inserts happen in one transaction, which is only committed if at
    /// least one record was actually new.
    ///
    /// # Returns
    ///
    /// The hashes that were inserted, in input order
    fn insert_missing(&mut self, records: &[(&str, &Item)]) -> StorageResult<Vec<String>>;

    /// Reads every stored item
    fn load_all(&self) -> StorageResult<HashMap<String, Item>>;

    /// Counts stored items
    fn count(&self) -> StorageResult<u64>;
}
