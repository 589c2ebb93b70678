/// Scan stage definitions for tracking a single audit request
///
/// This module defines every stage a scan passes through between receiving a
/// URL and handing back a stored report identifier.
use std::fmt;

/// Represents the current stage of a scan request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanStage {
    // ===== Active Stages =====
    /// Input URL is being trimmed, defaulted and parsed
    Validating,

    /// Target page is being downloaded
    Fetching,

    /// Signals are being extracted from the downloaded HTML
    Extracting,

    /// Score and summary are being computed (concurrently)
    Scoring,

    /// The finished record is being written to the report store
    Persisting,

    // ===== Terminal Stages =====
    /// Record stored, identifier handed to the caller
    Done,

    /// Scan aborted; no record exists
    Failed,
}

impl ScanStage {
    /// Returns true if this is a terminal stage
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Returns true if the scan is still in progress
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns the stage that follows this one on the success path
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Validating => Some(Self::Fetching),
            Self::Fetching => Some(Self::Extracting),
            Self::Extracting => Some(Self::Scoring),
            Self::Scoring => Some(Self::Persisting),
            Self::Persisting => Some(Self::Done),
            Self::Done | Self::Failed => None,
        }
    }

    /// Returns true if moving from `self` to `to` is a legal transition
    ///
    /// Any active stage may fail; otherwise stages advance strictly in order.
    pub fn can_transition_to(&self, to: ScanStage) -> bool {
        if to == Self::Failed {
            return self.is_active();
        }
        self.next() == Some(to)
    }

    /// Short lowercase label used in log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validating => "validating",
            Self::Fetching => "fetching",
            Self::Extracting => "extracting",
            Self::Scoring => "scoring",
            Self::Persisting => "persisting",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    /// Returns all stages in pipeline order
    pub fn all_stages() -> Vec<Self> {
        vec![
            Self::Validating,
            Self::Fetching,
            Self::Extracting,
            Self::Scoring,
            Self::Persisting,
            Self::Done,
            Self::Failed,
        ]
    }
}

impl fmt::Display for ScanStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
