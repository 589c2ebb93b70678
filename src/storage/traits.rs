//! Storage traits and error types
//!
//! This module defines the trait interface for report store backends and
//! associated error types.

use crate::storage::ScanRecord;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored row could not be turned back into a record
    #[error("Corrupt record {id}: {reason}")]
    Corrupt { id: String, reason: String },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for report store implementations
///
/// Records are written once and never updated. Implementations must be
/// shareable between request handlers.
pub trait ReportStore: Send + Sync {
    /// Persists a new scan record
    ///
    /// # Returns
    ///
    /// The id of the stored record
    fn create(&self, record: &ScanRecord) -> StorageResult<String>;

    /// Looks up a record by id
    fn find_by_id(&self, id: &str) -> StorageResult<Option<ScanRecord>>;

    /// Returns up to `limit` records, newest first
    fn list_recent(&self, limit: usize) -> StorageResult<Vec<ScanRecord>>;
}
