//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Classifind database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One row per discovered listing
CREATE TABLE IF NOT EXISTS items (
    hash TEXT PRIMARY KEY,
    url TEXT NOT NULL,
    data TEXT NOT NULL
);
"#;

/// Initializes the database schema
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
