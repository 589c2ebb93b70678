//! Human-readable summaries of a scan
//!
//! A [`Summarizer`] asks an optional [`TextGenerator`] for a structured
//! `{good, issues, steps}` summary and falls back to a deterministic,
//! localized rule set whenever the generator is absent or fails.

mod client;
mod fallback;
mod lang;

pub use client::{
    GenerationRequest, OpenAiClient, SummaryServiceError, TextGenerator, JSON_INSTRUCTION,
    SYSTEM_ROLE,
};
pub use fallback::fallback_summary;
pub use lang::{Lang, UnsupportedLang};

use crate::audit::Signals;
use crate::config::SummarizerConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Most "good" findings kept in a summary
pub const MAX_GOOD: usize = 4;

/// Most issues kept in a summary
pub const MAX_ISSUES: usize = 6;

/// Number of next steps a summary aims for
pub const STEP_COUNT: usize = 3;

/// Structured scan summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Summary {
    pub good: Vec<String>,
    pub issues: Vec<String>,
    pub steps: Vec<String>,
}

impl Summary {
    /// Applies the per-list limits
    pub fn truncated(mut self) -> Self {
        self.good.truncate(MAX_GOOD);
        self.issues.truncate(MAX_ISSUES);
        self.steps.truncate(STEP_COUNT);
        self
    }
}

/// Parses generator output into a summary
///
/// Content that is not a JSON object yields an empty summary. A key that is
/// missing or not a list yields an empty list; non-string items are skipped.
pub fn parse_generated_summary(content: &str) -> Summary {
    let object = match serde_json::from_str::<Value>(content) {
        Ok(Value::Object(object)) => object,
        _ => return Summary::default(),
    };

    let strings = |key: &str| -> Vec<String> {
        object
            .get(key)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    };

    Summary {
        good: strings("good"),
        issues: strings("issues"),
        steps: strings("steps"),
    }
    .truncated()
}

/// Produces summaries, never failing
#[derive(Clone)]
pub struct Summarizer {
    generator: Option<Arc<dyn TextGenerator>>,
    timeout: Duration,
}

impl Summarizer {
    /// Summarizer that always uses the rule-based fallback
    pub fn fallback_only() -> Self {
        Self {
            generator: None,
            timeout: Duration::from_millis(SummarizerConfig::default().timeout_ms),
        }
    }

    /// Summarizer backed by the given generator
    pub fn with_generator(generator: Arc<dyn TextGenerator>, timeout: Duration) -> Self {
        Self {
            generator: Some(generator),
            timeout,
        }
    }

    /// Builds the summarizer from configuration
    ///
    /// Without an API key in the environment the fallback is used.
    pub fn from_config(config: &SummarizerConfig) -> Result<Self, reqwest::Error> {
        let timeout = Duration::from_millis(config.timeout_ms);
        match OpenAiClient::from_config(config)? {
            Some(client) => Ok(Self::with_generator(Arc::new(client), timeout)),
            None => {
                tracing::info!("No summarizer API key configured, using rule-based summaries");
                Ok(Self {
                    generator: None,
                    timeout,
                })
            }
        }
    }

    /// Returns true if a text generator is configured
    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    /// Summarizes the signals of one page in the requested language
    pub async fn summarize(&self, url: &str, lang: Lang, signals: &Signals) -> Summary {
        let Some(generator) = &self.generator else {
            return fallback_summary(lang, signals);
        };

        let request = GenerationRequest::new(url, lang, signals);
        let timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);

        let result = match tokio::time::timeout(self.timeout, generator.generate(&request)).await
        {
            Ok(result) => result,
            Err(_) => Err(SummaryServiceError::Timeout(timeout_ms)),
        };

        match result {
            Ok(content) => parse_generated_summary(&content),
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Summary generation failed, using fallback");
                fallback_summary(lang, signals)
            }
        }
    }
}

impl std::fmt::Debug for Summarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Summarizer")
            .field("has_generator", &self.has_generator())
            .field("timeout", &self.timeout)
            .finish()
    }
}
