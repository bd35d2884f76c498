use crate::errors::StorageError;
use crate::models::{LogEntry, LogRow, NewLogEntry};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};
use std::{path::Path, time::Duration};
use tracing::{debug, info};

const SCHEMA: &str = r#"CREATE TABLE IF NOT EXISTS logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp TEXT NOT NULL,
    bristol_score INTEGER NOT NULL,
    color TEXT NOT NULL,
    quantity TEXT,
    urgency TEXT,
    pain_level INTEGER,
    notes TEXT,
    has_blood INTEGER NOT NULL DEFAULT 0,
    has_mucus INTEGER NOT NULL DEFAULT 0,
    is_floating INTEGER NOT NULL DEFAULT 0,
    smell TEXT
)"#;

/// SQLite-backed store for log entries.
///
/// SQLite serializes writers itself; the busy timeout makes a second writer
/// wait for the lock instead of failing.
#[derive(Debug, Clone)]
pub struct LogStore {
    pool: SqlitePool,
}

impl LogStore {
    /// Open the database file, creating it and its parent directory if absent.
    /// Call [`LogStore::initialize`] before use.
    pub async fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|source| StorageError::DirectoryCreate {
                        path: parent.to_path_buf(),
                        source,
                    })?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        info!("opened database at {}", path.display());
        Ok(Self { pool })
    }

    /// Private in-memory database. A single pinned connection keeps it alive.
    pub async fn open_in_memory() -> Result<Self, StorageError> {
        let options: SqliteConnectOptions = "sqlite::memory:".parse()?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    pub async fn initialize(&self) -> Result<(), StorageError> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn add(&self, entry: &NewLogEntry) -> Result<i64, StorageError> {
        let result = sqlx::query(
            "INSERT INTO logs (timestamp, bristol_score, color, quantity, urgency, pain_level, notes, has_blood, has_mucus, is_floating, smell)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&entry.timestamp)
        .bind(entry.bristol_score)
        .bind(&entry.color)
        .bind(&entry.quantity)
        .bind(&entry.urgency)
        .bind(entry.pain_level)
        .bind(&entry.notes)
        .bind(i64::from(entry.has_blood))
        .bind(i64::from(entry.has_mucus))
        .bind(i64::from(entry.is_floating))
        .bind(&entry.smell)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!(id, "inserted log entry");
        Ok(id)
    }

    /// All entries, newest timestamp first. Timestamps compare as strings.
    pub async fn list(&self) -> Result<Vec<LogEntry>, StorageError> {
        let rows: Vec<LogRow> = sqlx::query_as(
            "SELECT id, timestamp, bristol_score, color, quantity, urgency, pain_level, notes, has_blood, has_mucus, is_floating, smell
             FROM logs ORDER BY timestamp DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(LogEntry::from).collect())
    }

    /// Deleting a missing id is not an error. Returns whether a row was removed.
    pub async fn remove(&self, id: i64) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM logs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let removed = result.rows_affected() > 0;
        debug!(id, removed, "delete log entry");
        Ok(removed)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
