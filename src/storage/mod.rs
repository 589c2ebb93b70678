//! Storage module for persisting scan reports
//!
//! This module handles all database operations for the auditor, including:
//! - SQLite database initialization and schema management
//! - Writing completed scan records
//! - Report lookup by id and the recent-scans listing

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{ReportStore, StorageError, StorageResult};

use crate::audit::Signals;
use crate::summary::{Lang, Summary};
use crate::AuditError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(AuditError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> Result<SqliteStorage, AuditError> {
    Ok(SqliteStorage::new(path)?)
}

/// One persisted scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRecord {
    pub id: String,
    pub url: String,
    pub email: Option<String>,
    pub lang: Lang,
    pub signals: Signals,
    pub summary: Summary,
    pub score: u8,
    pub created_at: DateTime<Utc>,
}

impl ScanRecord {
    /// Creates a record with a fresh v4 id and the current time
    pub fn new(
        url: &str,
        email: Option<String>,
        lang: Lang,
        signals: Signals,
        summary: Summary,
        score: u8,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            url: url.to_string(),
            email,
            lang,
            signals,
            summary,
            score,
            created_at: Utc::now(),
        }
    }
}
