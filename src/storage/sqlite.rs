//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the ItemStore trait.

use crate::item::Item;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{ItemStore, StorageError, StorageResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;

/// SQLite storage backend
pub struct SqliteItemStore {
    conn: Connection,
}

impl SqliteItemStore {
    /// Opens (creating if needed) the database at `path`
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch("PRAGMA synchronous = NORMAL;")?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

impl ItemStore for SqliteItemStore {
    fn contains(&self, hash: &str) -> StorageResult<bool> {
        let found: Option<i64> = self
            .conn
            .query_row("SELECT 1 FROM items WHERE hash = ?1", params![hash], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(found.is_some())
    }

    fn insert_missing(&mut self, records: &[(&str, &Item)]) -> StorageResult<Vec<String>> {
        let tx = self.conn.transaction()?;
        let mut inserted = Vec::new();

        for &(hash, item) in records {
            let exists: Option<i64> = tx
                .query_row("SELECT 1 FROM items WHERE hash = ?1", params![hash], |row| {
                    row.get(0)
                })
                .optional()?;
            if exists.is_some() {
                continue;
            }

            let data = serde_json::to_string(item).map_err(|source| {
                StorageError::Serialization {
                    hash: hash.to_string(),
                    source,
                }
            })?;
            tx.execute(
                "INSERT INTO items (hash, url, data) VALUES (?1, ?2, ?3)",
                params![hash, item.url, data],
            )?;
            inserted.push(hash.to_string());
        }

        // Dropping an uncommitted transaction rolls it back
        if !inserted.is_empty() {
            tx.commit()?;
        }

        Ok(inserted)
    }

    fn load_all(&self) -> StorageResult<HashMap<String, Item>> {
        let mut stmt = self.conn.prepare("SELECT hash, data FROM items")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut items = HashMap::new();
        for row in rows {
            let (hash, data) = row?;
            let item = serde_json::from_str(&data).map_err(|source| {
                StorageError::Serialization {
                    hash: hash.clone(),
                    source,
                }
            })?;
            items.insert(hash, item);
        }

        Ok(items)
    }

    fn count(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn item(title: &str) -> Item {
        Item {
            price: 100,
            title: title.to_string(),
            url: format!("/moskva/{}", title),
            category: "sport".to_string(),
            company: String::new(),
            location: "center".to_string(),
            date: "01 11".to_string(),
            photourls: vec![format!("//img.example.com/{}.jpg", title)],
        }
    }

    #[test]
    fn test_insert_missing_inserts_new_records() {
        let mut store = SqliteItemStore::new_in_memory().unwrap();
        let a = item("a");
        let b = item("b");

        let inserted = store.insert_missing(&[("ha", &a), ("hb", &b)]).unwrap();

        assert_eq!(inserted, vec!["ha", "hb"]);
        assert_eq!(store.count().unwrap(), 2);
        assert!(store.contains("ha").unwrap());
        assert!(!store.contains("hc").unwrap());
    }

    #[test]
    fn test_insert_missing_is_idempotent() {
        let mut store = SqliteItemStore::new_in_memory().unwrap();
        let a = item("a");

        store.insert_missing(&[("ha", &a)]).unwrap();
        let second = store.insert_missing(&[("ha", &a)]).unwrap();

        assert!(second.is_empty());
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_insert_missing_keeps_existing_payload() {
        let mut store = SqliteItemStore::new_in_memory().unwrap();
        let original = item("a");
        let changed = item("changed");

        store.insert_missing(&[("ha", &original)]).unwrap();
        let inserted = store.insert_missing(&[("ha", &changed)]).unwrap();

        assert!(inserted.is_empty());
        assert_eq!(store.load_all().unwrap()["ha"], original);
    }

    #[test]
    fn test_load_all_roundtrips_items() {
        let mut store = SqliteItemStore::new_in_memory().unwrap();
        let a = item("a");
        let b = item("b");
        store.insert_missing(&[("ha", &a), ("hb", &b)]).unwrap();

        let loaded = store.load_all().unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded["ha"], a);
        assert_eq!(loaded["hb"], b);
    }

    #[test]
    fn test_url_column_holds_listing_url() {
        let mut store = SqliteItemStore::new_in_memory().unwrap();
        store.insert_missing(&[("ha", &item("a"))]).unwrap();

        let url: String = store
            .conn
            .query_row("SELECT url FROM items WHERE hash = 'ha'", [], |row| row.get(0))
            .unwrap();
        assert_eq!(url, "/moskva/a");
    }

    #[test]
    fn test_file_database_persists_between_opens() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("items.db");

        {
            let mut store = SqliteItemStore::new(&path).unwrap();
            store.insert_missing(&[("ha", &item("a"))]).unwrap();
        }

        let store = SqliteItemStore::new(&path).unwrap();
        assert_eq!(store.count().unwrap(), 1);
        assert!(store.contains("ha").unwrap());
    }
}
