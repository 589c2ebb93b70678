//! PDF report generation
//!
//! Renders the same document as the markdown export onto A4 pages using the
//! standard Helvetica fonts, wrapping long summary items and breaking onto a
//! new page when the current one is full.

use crate::output::labels::Labels;
use crate::output::{OutputError, OutputResult};
use crate::storage::ScanRecord;
use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};

const PAGE_WIDTH: Mm = Mm(210.0);
const PAGE_HEIGHT: Mm = Mm(297.0);
const LAYER_NAME: &str = "Report";

/// Left margin in millimetres
const MARGIN_LEFT: f32 = 14.0;
/// Indent of list items in millimetres
const ITEM_INDENT: f32 = 18.0;
/// Baseline of the first line on a page
const TOP: f32 = 282.0;
/// Lowest baseline before a page break
const BOTTOM: f32 = 15.0;
/// Characters per wrapped list line
const WRAP_WIDTH: usize = 90;

const PT_TO_MM: f32 = 0.3528;

/// Renders a stored scan as PDF bytes
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - The PDF document, starting with `%PDF`
/// * `Err(OutputError::Pdf)` - The document could not be assembled
pub fn render_pdf_report(record: &ScanRecord) -> OutputResult<Vec<u8>> {
    let labels = Labels::for_lang(record.lang);
    let mut writer = PdfWriter::new("AI Website Assistant")?;

    writer.line("AI Website Assistant", 18.0, MARGIN_LEFT, true);
    writer.line(
        &format!(
            "{}: {}",
            labels.date,
            record.created_at.format("%Y-%m-%d %H:%M UTC")
        ),
        12.0,
        MARGIN_LEFT,
        false,
    );
    writer.gap(4.0);
    writer.line(&format!("URL: {}", record.url), 12.0, MARGIN_LEFT, false);
    writer.line(
        &format!("{}: {}/100", labels.overall_score, record.score),
        12.0,
        MARGIN_LEFT,
        false,
    );
    writer.gap(6.0);
    writer.line(labels.summary, 14.0, MARGIN_LEFT, true);

    writer.list(labels.good, &record.summary.good, false);
    writer.list(labels.issues, &record.summary.issues, false);
    writer.list(labels.steps, &record.summary.steps, true);

    writer.finish()
}

/// Splits text into lines of at most `max` characters on word boundaries
///
/// A single word longer than `max` is kept whole on its own line.
fn wrap_text(text: &str, max: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };

        if needed > max && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn pdf_error(error: impl std::fmt::Display) -> OutputError {
    OutputError::Pdf(error.to_string())
}

/// Cursor over the pages of a document being written top to bottom
struct PdfWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
}

impl PdfWriter {
    fn new(title: &str) -> OutputResult<Self> {
        let (doc, page, layer) = PdfDocument::new(title, PAGE_WIDTH, PAGE_HEIGHT, LAYER_NAME);
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(pdf_error)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_error)?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            y: TOP,
        })
    }

    fn line(&mut self, text: &str, size: f32, x: f32, bold: bool) {
        if self.y < BOTTOM {
            self.new_page();
        }

        let font = if bold { &self.bold } else { &self.regular };
        self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
        self.y -= size * PT_TO_MM * 1.3;
    }

    fn gap(&mut self, mm: f32) {
        self.y -= mm;
    }

    fn list(&mut self, heading: &str, items: &[String], numbered: bool) {
        self.gap(2.0);
        self.line(heading, 12.0, MARGIN_LEFT, true);

        if items.is_empty() {
            self.line("-", 11.0, ITEM_INDENT, false);
        }

        for (i, item) in items.iter().enumerate() {
            let marker = if numbered {
                format!("{}.", i + 1)
            } else {
                "-".to_string()
            };

            for (n, text) in wrap_text(item, WRAP_WIDTH).iter().enumerate() {
                let line = if n == 0 {
                    format!("{} {}", marker, text)
                } else {
                    format!("   {}", text)
                };
                self.line(&line, 11.0, ITEM_INDENT, false);
            }
            self.gap(1.5);
        }
    }

    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(PAGE_WIDTH, PAGE_HEIGHT, LAYER_NAME);
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = TOP;
    }

    fn finish(self) -> OutputResult<Vec<u8>> {
        self.doc.save_to_bytes().map_err(pdf_error)
    }
}
