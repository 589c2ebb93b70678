//! State module for tracking scan progress
//!
//! # Components
//!
//! - `ScanStage`: Tracks the stage of a single scan request (validating,
//!   fetching, extracting, scoring, persisting, done or failed)

mod scan_stage;

pub use scan_stage::ScanStage;
