//! Storage module for persisting discovered items
//!
//! Items are stored in a single SQLite table keyed by identity hash, with
//! the listing URL alongside an opaque JSON payload of the whole record.

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteItemStore;
pub use traits::{ItemStore, StorageError, StorageResult};

use crate::ClassifindError;
use std::path::Path;

/// Initializes or opens an item database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteItemStore)` - Successfully initialized storage
/// * `Err(ClassifindError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> Result<SqliteItemStore, ClassifindError> {
    Ok(SqliteItemStore::new(path)?)
}
