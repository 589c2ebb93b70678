//! Markdown report generation
//!
//! This module renders a stored scan as a downloadable markdown document:
//! title, date, URL and score followed by the summary lists.

use crate::output::labels::Labels;
use crate::output::OutputResult;
use crate::storage::ScanRecord;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown report for a scan
///
/// # Arguments
///
/// * `record` - The stored scan
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown report
/// * `Err(OutputError)` - Failed to write report
pub fn generate_markdown_report(record: &ScanRecord, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_report(record);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a scan as markdown, with headings in the scan's language
pub fn format_markdown_report(record: &ScanRecord) -> String {
    let labels = Labels::for_lang(record.lang);
    let mut md = String::new();

    md.push_str("# AI Website Assistant\n\n");
    md.push_str(&format!(
        "- **{}**: {}\n",
        labels.date,
        record.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    md.push_str(&format!("- **URL**: {}\n", record.url));
    md.push_str(&format!(
        "- **{}**: {}/100\n\n",
        labels.overall_score, record.score
    ));

    push_list(&mut md, labels.good, &record.summary.good, false);
    push_list(&mut md, labels.issues, &record.summary.issues, false);
    push_list(&mut md, labels.steps, &record.summary.steps, true);

    md
}

fn push_list(md: &mut String, heading: &str, items: &[String], numbered: bool) {
    md.push_str(&format!("## {}\n\n", heading));

    if items.is_empty() {
        md.push_str("-\n\n");
        return;
    }

    for (i, item) in items.iter().enumerate() {
        if numbered {
            md.push_str(&format!("{}. {}\n", i + 1, item));
        } else {
            md.push_str(&format!("- {}\n", item));
        }
    }
    md.push('\n');
}
