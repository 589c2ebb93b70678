//! Output module for rendering and exporting scan reports
//!
//! This module handles:
//! - HTML report, admin and landing pages
//! - Markdown and PDF report downloads
//! - CSV export of recent scans

mod csv;
pub mod html;
mod labels;
mod markdown;
mod pdf;

pub use csv::{export_csv, write_csv_export};
pub use labels::Labels;
pub use markdown::{format_markdown_report, generate_markdown_report};
pub use pdf::render_pdf_report;

use crate::storage::{ReportStore, StorageError};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("PDF error: {0}")]
    Pdf(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Writes the CSV export of the most recent scans
///
/// # Arguments
///
/// * `store` - The report store to read from
/// * `limit` - Maximum number of scans to export
/// * `output_path` - Path of the CSV file to write
///
/// # Returns
///
/// * `Ok(usize)` - Number of exported scans
/// * `Err(OutputError)` - Failed to read scans or write the file
pub fn export_recent_csv(
    store: &dyn ReportStore,
    limit: usize,
    output_path: &Path,
) -> OutputResult<usize> {
    let records = store.list_recent(limit)?;
    write_csv_export(&records, output_path)?;
    Ok(records.len())
}
