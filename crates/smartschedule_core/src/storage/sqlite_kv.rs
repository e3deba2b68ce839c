//! SQLite-backed key-value store.
//!
//! # Invariants
//! - The connection must come from `db::open_db*` so `kv_store` exists.
//! - `set` is an upsert; the last write for a key wins.

use super::{KvStore, StorageResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::borrow::Borrow;

/// Key-value store persisted in the `kv_store` table.
///
/// Holds either a borrowed `&Connection` (one request) or an owned
/// `Connection` (a long-lived session).
pub struct SqliteKvStore<C: Borrow<Connection>> {
    conn: C,
}

impl<C: Borrow<Connection>> SqliteKvStore<C> {
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    fn conn(&self) -> &Connection {
        self.conn.borrow()
    }
}

impl<C: Borrow<Connection>> KvStore for SqliteKvStore<C> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn()
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.conn().execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.conn()
            .execute("DELETE FROM kv_store WHERE key = ?1;", [key])?;
        Ok(())
    }
}
