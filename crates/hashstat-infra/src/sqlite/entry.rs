//! SQLite entry repository implementation.
//!
//! Implements `EntryRepository` from `hashstat-core` using sqlx with split
//! read/write pools. The table name is a constructor parameter, so it is
//! validated as a plain identifier before being spliced into SQL.

use hashstat_core::repository::entry::EntryRepository;
use hashstat_types::entry::{AggregateStats, Entry, EntryId};
use hashstat_types::error::RepositoryError;
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `EntryRepository`.
#[derive(Clone)]
pub struct SqliteEntryRepository {
    pool: DatabasePool,
    table: String,
}

impl SqliteEntryRepository {
    /// Create a repository over `table_name`. Does not touch the database.
    pub fn new(pool: DatabasePool, table_name: impl Into<String>) -> Result<Self, RepositoryError> {
        let table = table_name.into();
        if !is_valid_identifier(&table) {
            return Err(RepositoryError::InvalidTableName(table));
        }
        Ok(Self { pool, table })
    }

    /// Create a repository and make sure its table exists.
    pub async fn open(pool: DatabasePool, table_name: impl Into<String>) -> Result<Self, RepositoryError> {
        let repo = Self::new(pool, table_name)?;
        repo.init_schema().await?;
        Ok(repo)
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    fn create_table_sql(&self) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {} (id INTEGER PRIMARY KEY AUTOINCREMENT, digest TEXT, duration INTEGER)",
            self.table
        )
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn storage_err(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Storage(e.to_string())
}

fn entry_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Entry, sqlx::Error> {
    let id: i64 = row.try_get("id")?;
    Ok(Entry {
        id: EntryId(id),
        digest: row.try_get("digest")?,
        duration_micros: row.try_get("duration")?,
    })
}

// ---------------------------------------------------------------------------
// EntryRepository implementation
// ---------------------------------------------------------------------------

impl EntryRepository for SqliteEntryRepository {
    async fn init_schema(&self) -> Result<(), RepositoryError> {
        let sql = self.create_table_sql();
        sqlx::query(&sql)
            .execute(&self.pool.writer)
            .await
            .map_err(storage_err)?;

        tracing::debug!(table = %self.table, "entry schema ready");
        Ok(())
    }

    async fn reserve(&self) -> Result<EntryId, RepositoryError> {
        let sql = format!("INSERT INTO {} DEFAULT VALUES", self.table);
        let result = sqlx::query(&sql)
            .execute(&self.pool.writer)
            .await
            .map_err(storage_err)?;

        Ok(EntryId(result.last_insert_rowid()))
    }

    async fn finalize(
        &self,
        id: EntryId,
        digest: &str,
        duration_micros: i64,
    ) -> Result<(), RepositoryError> {
        let sql = format!(
            "UPDATE {} SET digest = ?, duration = ? WHERE id = ? AND digest IS NULL",
            self.table
        );
        let result = sqlx::query(&sql)
            .bind(digest)
            .bind(duration_micros)
            .bind(id.get())
            .execute(&self.pool.writer)
            .await
            .map_err(storage_err)?;

        if result.rows_affected() > 0 {
            return Ok(());
        }

        // Nothing updated: either the id is unknown or it was finalized already.
        let sql = format!("SELECT id FROM {} WHERE id = ?", self.table);
        let existing = sqlx::query(&sql)
            .bind(id.get())
            .fetch_optional(&self.pool.writer)
            .await
            .map_err(storage_err)?;

        match existing {
            Some(_) => Err(RepositoryError::AlreadyFinalized(id)),
            None => Err(RepositoryError::NotFound(id)),
        }
    }

    async fn get(&self, id: EntryId) -> Result<Entry, RepositoryError> {
        let sql = format!("SELECT id, digest, duration FROM {} WHERE id = ?", self.table);
        let row = sqlx::query(&sql)
            .bind(id.get())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(storage_err)?;

        match row {
            Some(row) => entry_from_row(&row).map_err(storage_err),
            None => Err(RepositoryError::NotFound(id)),
        }
    }

    async fn aggregate(&self) -> Result<AggregateStats, RepositoryError> {
        let sql = format!(
            "SELECT COUNT(*) AS count, AVG(duration) AS average FROM {}",
            self.table
        );
        let row = sqlx::query(&sql)
            .fetch_one(&self.pool.reader)
            .await
            .map_err(storage_err)?;

        let count: i64 = row.try_get("count").map_err(storage_err)?;
        let average: Option<f64> = row.try_get("average").map_err(storage_err)?;

        // AVG over zero non-null durations is NULL; report 0.0 instead.
        Ok(match average {
            Some(average_duration) => AggregateStats {
                count,
                average_duration,
            },
            None => AggregateStats::empty(count),
        })
    }

    // Dropping the table also deletes its `sqlite_sequence` row, so ids
    // restart at 1.
    async fn clear(&self) -> Result<(), RepositoryError> {
        let drop_sql = format!("DROP TABLE IF EXISTS {}", self.table);
        let create_sql = self.create_table_sql();

        let mut tx = self.pool.writer.begin().await.map_err(storage_err)?;
        sqlx::query(&drop_sql)
            .execute(&mut *tx)
            .await
            .map_err(storage_err)?;
        sqlx::query(&create_sql)
            .execute(&mut *tx)
            .await
            .map_err(storage_err)?;
        tx.commit().await.map_err(storage_err)?;

        tracing::debug!(table = %self.table, "entry table recreated");
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
