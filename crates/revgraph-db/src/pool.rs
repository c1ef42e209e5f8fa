//! Scoped SQLite connection handling.
//!
//! A file-backed pool opens a fresh connection for each logical operation and
//! drops it when the closure returns, on success and error paths alike. The
//! in-memory variant keeps one connection alive behind a mutex, since an
//! in-memory database disappears with its last connection.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rusqlite::{Connection, OpenFlags};
use thiserror::Error;
use tracing::debug;

/// Database error types.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Connection(#[from] rusqlite::Error),

    #[error("Database file not found: {0}")]
    NotFound(PathBuf),

    #[error("Query returned no rows: {0}")]
    EmptyResult(String),

    #[error("Column {index} has unexpected type: expected {expected}")]
    ColumnType { index: usize, expected: &'static str },

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Connection lock poisoned")]
    Poisoned,
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

enum Source {
    File { path: PathBuf, flags: OpenFlags },
    Memory(Mutex<Connection>),
}

/// Handle to the relational review store.
pub struct DbPool {
    source: Source,
}

impl DbPool {
    /// Open an existing database file for read-only access.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DbError::NotFound(path.to_path_buf()));
        }
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        Self::file(path, flags)
    }

    /// Open (creating if needed) a database file for read-write access.
    pub fn create(path: impl AsRef<Path>) -> DbResult<Self> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        Self::file(path.as_ref(), flags)
    }

    fn file(path: &Path, flags: OpenFlags) -> DbResult<Self> {
        // Fail at construction time rather than on the first query.
        Connection::open_with_flags(path, flags)?;
        debug!(path = %path.display(), "Opened database");
        Ok(Self {
            source: Source::File { path: path.to_path_buf(), flags },
        })
    }

    /// Private in-memory database, mainly for tests.
    pub fn in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            source: Source::Memory(Mutex::new(conn)),
        })
    }

    /// Run `f` with a connection scoped to this call.
    pub fn with_conn<T, F>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&Connection) -> DbResult<T>,
    {
        match &self.source {
            Source::File { path, flags } => {
                let conn = Connection::open_with_flags(path, *flags)?;
                f(&conn)
            }
            Source::Memory(conn) => {
                let conn = conn.lock().map_err(|_| DbError::Poisoned)?;
                f(&conn)
            }
        }
    }

    /// Run `f` with a mutable connection scoped to this call.
    pub fn with_conn_mut<T, F>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&mut Connection) -> DbResult<T>,
    {
        match &self.source {
            Source::File { path, flags } => {
                let mut conn = Connection::open_with_flags(path, *flags)?;
                f(&mut conn)
            }
            Source::Memory(conn) => {
                let mut conn = conn.lock().map_err(|_| DbError::Poisoned)?;
                f(&mut conn)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_file() {
        let err = DbPool::open("/nonexistent/reviews.db").err().unwrap();
        assert!(matches!(err, DbError::NotFound(_)));
    }

    #[test]
    fn test_in_memory_persists_between_calls() {
        let pool = DbPool::in_memory().unwrap();
        pool.with_conn(|conn| {
            conn.execute_batch("CREATE TABLE t (x INTEGER); INSERT INTO t VALUES (7);")?;
            Ok(())
        })
        .unwrap();

        let x: i64 = pool
            .with_conn(|conn| Ok(conn.query_row("SELECT x FROM t", [], |r| r.get(0))?))
            .unwrap();
        assert_eq!(x, 7);
    }
}
