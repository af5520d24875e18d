//! Key-value storage contract and SQLite implementation.
//!
//! # Invariants
//! - `put` is an upsert; the last write for a key wins.
//! - Keys are opaque namespace strings owned by callers.

use super::RepoResult;
use rusqlite::{params, Connection, OptionalExtension};

/// Durable byte storage addressed by string keys.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> RepoResult<Option<Vec<u8>>>;
    fn put(&self, key: &str, value: &[u8]) -> RepoResult<()>;
    /// Returns whether a value was present.
    fn delete(&self, key: &str) -> RepoResult<bool>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> RepoResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &[u8]) -> RepoResult<()> {
        (**self).put(key, value)
    }

    fn delete(&self, key: &str) -> RepoResult<bool> {
        (**self).delete(key)
    }
}

/// `kv_store` table accessor owning its connection.
pub struct SqliteKeyValueStore {
    conn: Connection,
}

impl SqliteKeyValueStore {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(&self, key: &str) -> RepoResult<Option<Vec<u8>>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn put(&self, key: &str, value: &[u8]) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn delete(&self, key: &str) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM kv_store WHERE key = ?1;", [key])?;
        Ok(changed > 0)
    }
}
