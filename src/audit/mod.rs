//! Audit pipeline
//!
//! This module contains the parts of a single-page audit:
//! - Fetching the page over HTTP
//! - Extracting HTML/SEO/GDPR signals
//! - Scoring the signals
//! - Orchestrating a scan from request to stored report

mod extractor;
mod fetcher;
mod orchestrator;
mod scorer;

pub use extractor::{extract_signals, Signals};
pub use fetcher::{build_http_client, fetch_html, FetchError};
pub use orchestrator::{ScanError, ScanOutcome, ScanRequest, Scanner};
pub use scorer::{flag_score, weighted_score, ScoringStrategy};
