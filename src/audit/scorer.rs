//! Scoring strategies
//!
//! Two formulas map a [`Signals`] record to an integer in `0..=100`. Both are
//! pure: the same signals always produce the same score.

use crate::audit::Signals;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const META_TITLE_POINTS: i32 = 7;
const META_DESCRIPTION_POINTS: i32 = 7;
const META_H1_POINTS: i32 = 6;
const BUCKET_CAP: i32 = 20;

const SCRIPT_HEAVY: usize = 20;
const SCRIPT_BUSY: usize = 10;
const IMAGE_HEAVY_BYTES: u64 = 500_000;
const IMAGE_LARGE_BYTES: u64 = 200_000;

const GDPR_HINT_POINTS: i32 = 10;
const FLAG_POINTS: u8 = 20;

/// Named scoring formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringStrategy {
    /// Four-bucket formula: meta, mobile, transport, speed and GDPR hints
    #[default]
    Weighted,

    /// Five boolean checks worth 20 points each
    Flags,
}

impl ScoringStrategy {
    /// Scores the signals with this strategy
    pub fn score(&self, signals: &Signals) -> u8 {
        match self {
            Self::Weighted => weighted_score(signals),
            Self::Flags => flag_score(signals),
        }
    }

    /// Configuration name of the strategy
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weighted => "weighted",
            Self::Flags => "flags",
        }
    }
}

impl fmt::Display for ScoringStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ScoringStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weighted" => Ok(Self::Weighted),
            "flags" => Ok(Self::Flags),
            other => Err(format!("unknown scoring strategy '{}'", other)),
        }
    }
}

/// Weighted four-bucket score
///
/// | Bucket | Points |
/// |--------|--------|
/// | Meta completeness | title 7 + description 7 + h1 6, capped at 20 |
/// | Mobile | 20 with a viewport meta tag |
/// | Transport security | 20 over HTTPS |
/// | Speed heuristic | 20, minus script and image penalties, clamped to 0..=20 |
/// | GDPR hints | 10 for cookie wording + 10 for a privacy policy link |
pub fn weighted_score(signals: &Signals) -> u8 {
    let mobile = if signals.has_viewport_meta { BUCKET_CAP } else { 0 };
    let transport = if signals.has_https { BUCKET_CAP } else { 0 };
    let total =
        meta_points(signals) + mobile + transport + speed_points(signals) + gdpr_points(signals);

    total.clamp(0, 100) as u8
}

/// Five-flag score: HTTPS, viewport, title and description, h1, favicon
pub fn flag_score(signals: &Signals) -> u8 {
    let passed = [
        signals.has_https,
        signals.has_viewport_meta,
        signals.title.is_some() && signals.meta_description.is_some(),
        signals.h1.is_some(),
        signals.favicon,
    ]
    .into_iter()
    .filter(|flag| *flag)
    .count() as u8;

    passed * FLAG_POINTS
}

fn meta_points(signals: &Signals) -> i32 {
    let mut meta = 0;
    if signals.title.is_some() {
        meta += META_TITLE_POINTS;
    }
    if signals.meta_description.is_some() {
        meta += META_DESCRIPTION_POINTS;
    }
    if signals.h1.is_some() {
        meta += META_H1_POINTS;
    }
    meta.min(BUCKET_CAP)
}

fn speed_points(signals: &Signals) -> i32 {
    let mut speed = BUCKET_CAP;

    if signals.script_count > SCRIPT_HEAVY {
        speed -= 10;
    } else if signals.script_count > SCRIPT_BUSY {
        speed -= 5;
    }

    let avg_img = signals.avg_img_bytes_approx.unwrap_or(0);
    if avg_img > IMAGE_HEAVY_BYTES {
        speed -= 10;
    } else if avg_img > IMAGE_LARGE_BYTES {
        speed -= 5;
    }

    speed.clamp(0, BUCKET_CAP)
}

fn gdpr_points(signals: &Signals) -> i32 {
    let mut gdpr = 0;
    if signals.has_cookie_words {
        gdpr += GDPR_HINT_POINTS;
    }
    if signals.privacy_policy_url_found {
        gdpr += GDPR_HINT_POINTS;
    }
    gdpr
}
