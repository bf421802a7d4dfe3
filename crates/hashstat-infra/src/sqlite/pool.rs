//! Database pool with split reader/writer connections in WAL mode.
//!
//! SQLite allows only one writer at a time. This module provides a `DatabasePool`
//! with a multi-connection reader pool for concurrent reads and a single-connection
//! writer pool for serialized writes. Both use WAL journal mode.
//!
//! The split requires a file-backed database; `sqlite::memory:` URLs would give
//! each pool its own private database.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// Split read/write pool for SQLite with WAL mode.
///
/// - `reader`: Multi-connection pool (up to 8) for concurrent SELECT queries.
/// - `writer`: Single-connection pool for serialized INSERT/UPDATE/DDL.
#[derive(Clone)]
pub struct DatabasePool {
    pub reader: SqlitePool,
    pub writer: SqlitePool,
}

impl DatabasePool {
    /// Create a new DatabasePool with split reader/writer connections.
    ///
    /// The writer opens first so a missing database file exists before the
    /// read-only pool connects. Schema setup is left to the repositories.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let base_opts = SqliteConnectOptions::from_str(database_url)?
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(5))
            .create_if_missing(true);

        let read_opts = base_opts.clone().read_only(true);
        let write_opts = base_opts;

        let writer = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(write_opts)
            .await?;

        let reader = SqlitePoolOptions::new()
            .max_connections(8)
            .connect_with(read_opts)
            .await?;

        tracing::debug!(url = %database_url, "opened sqlite pools");
        Ok(Self { reader, writer })
    }

    /// Close both pools. Calling this more than once is harmless.
    pub async fn close(&self) {
        self.writer.close().await;
        self.reader.close().await;
    }

    pub fn is_closed(&self) -> bool {
        self.writer.is_closed() && self.reader.is_closed()
    }
}

/// Database URL for `{data_dir}/hashstat.db`, creating the file on first use.
pub fn database_url_for(data_dir: &Path) -> String {
    format!("sqlite://{}?mode=rwc", data_dir.join("hashstat.db").display())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn temp_pool() -> (TempDir, DatabasePool) {
        let dir = tempfile::tempdir().unwrap();
        let pool = DatabasePool::new(&database_url_for(dir.path())).await.unwrap();
        (dir, pool)
    }

    #[tokio::test]
    async fn test_pool_wal_mode() {
        let (_dir, pool) = temp_pool().await;

        let result: (String,) = sqlx::query_as("PRAGMA journal_mode")
            .fetch_one(&pool.writer)
            .await
            .unwrap();

        assert_eq!(result.0.to_lowercase(), "wal");
    }

    #[tokio::test]
    async fn test_reader_is_read_only() {
        let (_dir, pool) = temp_pool().await;
        sqlx::query("CREATE TABLE t (x INTEGER)")
            .execute(&pool.writer)
            .await
            .unwrap();

        let result = sqlx::query("INSERT INTO t (x) VALUES (1)")
            .execute(&pool.reader)
            .await;
        assert!(result.is_err(), "reader pool must reject writes");
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let (_dir, pool) = temp_pool().await;
        pool.close().await;
        pool.close().await;
        assert!(pool.is_closed());
    }

    #[test]
    fn test_database_url_for() {
        let url = database_url_for(Path::new("/tmp/hs"));
        assert!(url.starts_with("sqlite://"));
        assert!(url.ends_with("hashstat.db?mode=rwc"));
    }
}
