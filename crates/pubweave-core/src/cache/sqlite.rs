//! SQLite-backed durable response cache

use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use super::{RequestKey, ResponseCache};
use crate::error::CacheError;

/// Durable cache surviving process restarts. WAL journaling keeps
/// concurrent runs against the same store from corrupting entries;
/// identical keys resolve last-writer-wins.
pub struct SqliteCache {
    conn: Mutex<Connection>,
}

impl SqliteCache {
    /// Open (or create) a cache database at the given path.
    pub fn open(path: &Path) -> Result<Self, CacheError> {
        let conn = Connection::open(path)
            .map_err(|e| CacheError::Storage(format!("open: {}", e)))?;
        Self::init_with_connection(conn)
    }

    /// Create an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, CacheError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| CacheError::Storage(format!("open_in_memory: {}", e)))?;
        Self::init_with_connection(conn)
    }

    fn init_with_connection(conn: Connection) -> Result<Self, CacheError> {
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;

            CREATE TABLE IF NOT EXISTS responses (
                key TEXT PRIMARY KEY,
                body TEXT NOT NULL,
                stored_at INTEGER NOT NULL
            );
            ",
        )
        .map_err(|e| CacheError::Storage(format!("init_schema: {}", e)))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, CacheError> {
        self.conn
            .lock()
            .map_err(|_| CacheError::Storage("connection lock poisoned".to_string()))
    }
}

impl ResponseCache for SqliteCache {
    fn get(&self, key: &RequestKey) -> Result<Option<String>, CacheError> {
        let conn = self.lock()?;
        let body = conn
            .query_row(
                "SELECT body FROM responses WHERE key = ?1",
                params![key.canonical()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(body)
    }

    fn put(&self, key: &RequestKey, body: &str) -> Result<(), CacheError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO responses (key, body, stored_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET body = excluded.body, stored_at = excluded.stored_at",
            params![key.canonical(), body, Utc::now().timestamp()],
        )?;
        Ok(())
    }
}
