//! CSV export of recent scans

use crate::output::OutputResult;
use crate::storage::ScanRecord;
use chrono::SecondsFormat;
use std::fs::File;
use std::io::Write;
use std::path::Path;

const HEADER: &str = "date,url,email,score,lang";

/// Formats records as CSV
///
/// Text values are double-quoted with embedded quotes doubled; the score is
/// written bare. An empty slice produces an empty string, not a header.
pub fn export_csv(records: &[ScanRecord]) -> String {
    if records.is_empty() {
        return String::new();
    }

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(HEADER.to_string());

    for record in records {
        let date = record
            .created_at
            .to_rfc3339_opts(SecondsFormat::Millis, true);
        lines.push(format!(
            "{},{},{},{},{}",
            quote(&date),
            quote(&record.url),
            quote(record.email.as_deref().unwrap_or("")),
            record.score,
            quote(record.lang.as_str()),
        ));
    }

    lines.join("\n")
}

/// Writes the CSV export of `records` to `output_path`
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the export
/// * `Err(OutputError)` - Failed to write the file
pub fn write_csv_export(records: &[ScanRecord], output_path: &Path) -> OutputResult<()> {
    let mut file = File::create(output_path)?;
    file.write_all(export_csv(records).as_bytes())?;
    Ok(())
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}
