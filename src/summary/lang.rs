use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Report language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    En,
    Fi,
}

/// Returned when a language code is not supported
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported language '{0}', expected 'en' or 'fi'")]
pub struct UnsupportedLang(pub String);

impl Lang {
    /// Two-letter language code
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Fi => "fi",
        }
    }

    /// Picks the English or Finnish variant of a string
    pub fn pick<'a>(&self, en: &'a str, fi: &'a str) -> &'a str {
        match self {
            Self::En => en,
            Self::Fi => fi,
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Lang {
    type Err = UnsupportedLang;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "fi" => Ok(Self::Fi),
            other => Err(UnsupportedLang(other.to_string())),
        }
    }
}
