//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the ReportStore trait.

use crate::audit::Signals;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{ReportStore, StorageError, StorageResult};
use crate::storage::ScanRecord;
use crate::summary::{Lang, Summary};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const SELECT_COLUMNS: &str =
    "SELECT id, url, email, lang, signals, summary, score, created_at FROM scans";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

/// Raw column values of one `scans` row
struct ScanRow {
    id: String,
    url: String,
    email: Option<String>,
    lang: String,
    signals: String,
    summary: String,
    score: i64,
    created_at: String,
}

impl ScanRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            url: row.get(1)?,
            email: row.get(2)?,
            lang: row.get(3)?,
            signals: row.get(4)?,
            summary: row.get(5)?,
            score: row.get(6)?,
            created_at: row.get(7)?,
        })
    }

    fn into_record(self) -> StorageResult<ScanRecord> {
        let corrupt = |reason: String| StorageError::Corrupt {
            id: self.id.clone(),
            reason,
        };

        let lang = self
            .lang
            .parse::<Lang>()
            .map_err(|e| corrupt(e.to_string()))?;
        let score = u8::try_from(self.score)
            .ok()
            .filter(|score| *score <= 100)
            .ok_or_else(|| corrupt(format!("score {} out of range", self.score)))?;
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| corrupt(format!("bad timestamp: {}", e)))?
            .with_timezone(&Utc);
        let signals: Signals = serde_json::from_str(&self.signals)?;
        let summary: Summary = serde_json::from_str(&self.summary)?;

        Ok(ScanRecord {
            id: self.id,
            url: self.url,
            email: self.email,
            lang,
            signals,
            summary,
            score,
            created_at,
        })
    }
}

/// Fixed-width timestamp so text ordering matches time ordering
fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Counts stored scans
    pub fn count_scans(&self) -> StorageResult<u64> {
        let count: i64 = self
            .connection()
            .query_row("SELECT COUNT(*) FROM scans", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn connection(&self) -> MutexGuard<'_, Connection> {
        // A panic while holding the lock cannot leave a half-written row
        // behind, since every write is a single statement
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ReportStore for SqliteStorage {
    fn create(&self, record: &ScanRecord) -> StorageResult<String> {
        let signals = serde_json::to_string(&record.signals)?;
        let summary = serde_json::to_string(&record.summary)?;

        self.connection().execute(
            "INSERT INTO scans (id, url, email, lang, signals, summary, score, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                record.id,
                record.url,
                record.email,
                record.lang.as_str(),
                signals,
                summary,
                record.score,
                format_timestamp(&record.created_at),
            ],
        )?;

        Ok(record.id.clone())
    }

    fn find_by_id(&self, id: &str) -> StorageResult<Option<ScanRecord>> {
        let row = {
            let conn = self.connection();
            let mut stmt = conn.prepare(&format!("{} WHERE id = ?1", SELECT_COLUMNS))?;
            let row = stmt.query_row(params![id], ScanRow::from_row).optional()?;
            row
        };

        row.map(ScanRow::into_record).transpose()
    }

    fn list_recent(&self, limit: usize) -> StorageResult<Vec<ScanRecord>> {
        let rows = {
            let conn = self.connection();
            let mut stmt = conn.prepare(&format!(
                "{} ORDER BY created_at DESC, rowid DESC LIMIT ?1",
                SELECT_COLUMNS
            ))?;
            let limit = i64::try_from(limit).unwrap_or(i64::MAX);
            let rows = stmt
                .query_map(params![limit], ScanRow::from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        };

        rows.into_iter().map(ScanRow::into_record).collect()
    }
}
