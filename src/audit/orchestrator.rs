//! Scan orchestration
//!
//! A [`Scanner`] owns the shared collaborators (HTTP client, summarizer,
//! report store and optional notifier) and drives a single request through
//! validation, fetching, extraction, scoring and persistence.

use crate::audit::{build_http_client, extract_signals, fetch_html, FetchError, ScoringStrategy};
use crate::config::Config;
use crate::notify::{EmailSender, ResendMailer};
use crate::state::ScanStage;
use crate::storage::{ReportStore, ScanRecord, StorageError};
use crate::summary::{Lang, Summarizer, Summary};
use crate::url::normalize_scan_url;
use crate::UrlError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Reasons a scan can fail
///
/// The display text is the single message shown to the visitor.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Fetch(#[from] FetchError),

    #[error("Failed to save report: {0}")]
    Persistence(#[from] StorageError),
}

impl From<UrlError> for ScanError {
    fn from(error: UrlError) -> Self {
        Self::Validation(error.to_string())
    }
}

impl ScanError {
    /// Returns true if the caller supplied bad input or an unreachable site
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Persistence(_))
    }
}

/// One scan request as received from a visitor
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScanRequest {
    pub url: String,
    #[serde(default)]
    pub lang: Lang,
    #[serde(default)]
    pub email: Option<String>,
}

impl ScanRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_lang(mut self, lang: Lang) -> Self {
        self.lang = lang;
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Result of a successful scan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanOutcome {
    pub id: String,
    pub score: u8,
    pub summary: Summary,
}

/// Drives scans against shared collaborators
#[derive(Clone)]
pub struct Scanner {
    client: Client,
    fetch_timeout: Duration,
    strategy: ScoringStrategy,
    summarizer: Summarizer,
    store: Arc<dyn ReportStore>,
    notifier: Option<Arc<dyn EmailSender>>,
    public_base_url: String,
}

impl Scanner {
    /// Creates a scanner with default fetch settings, the fallback summarizer
    /// and no notifier
    pub fn new(store: Arc<dyn ReportStore>) -> Result<Self, reqwest::Error> {
        let config = Config::default();
        Ok(Self {
            client: build_http_client(&config.fetcher)?,
            fetch_timeout: Duration::from_millis(config.fetcher.timeout_ms),
            strategy: config.scoring.strategy,
            summarizer: Summarizer::fallback_only(),
            store,
            notifier: None,
            public_base_url: config.server.public_base_url,
        })
    }

    /// Builds a scanner and its collaborators from configuration
    ///
    /// Missing API keys disable the text generator and the notifier rather
    /// than failing.
    pub fn from_config(config: &Config, store: Arc<dyn ReportStore>) -> crate::Result<Self> {
        let notifier = ResendMailer::from_config(&config.email)?
            .map(|mailer| Arc::new(mailer) as Arc<dyn EmailSender>);
        if notifier.is_none() {
            tracing::info!("No email API key configured, report-ready emails disabled");
        }

        Ok(Self {
            client: build_http_client(&config.fetcher)?,
            fetch_timeout: Duration::from_millis(config.fetcher.timeout_ms),
            strategy: config.scoring.strategy,
            summarizer: Summarizer::from_config(&config.summarizer)?,
            store,
            notifier,
            public_base_url: config.server.public_base_url.clone(),
        })
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_strategy(mut self, strategy: ScoringStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_summarizer(mut self, summarizer: Summarizer) -> Self {
        self.summarizer = summarizer;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn EmailSender>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_public_base_url(mut self, base: impl Into<String>) -> Self {
        self.public_base_url = base.into();
        self
    }

    /// The store scans are persisted to
    pub fn store(&self) -> &Arc<dyn ReportStore> {
        &self.store
    }

    /// Public link to a stored report
    pub fn report_url(&self, id: &str) -> String {
        format!("{}/report/{}", self.public_base_url.trim_end_matches('/'), id)
    }

    /// Runs one scan to completion
    ///
    /// # Returns
    ///
    /// * `Ok(ScanOutcome)` - The record was stored under the returned id
    /// * `Err(ScanError)` - Nothing was stored
    pub async fn scan(&self, request: ScanRequest) -> Result<ScanOutcome, ScanError> {
        let mut stage = ScanStage::Validating;
        tracing::info!(url = %request.url, lang = %request.lang, stage = stage.as_str(), "Scan started");

        match self.run_stages(&request, &mut stage).await {
            Ok(outcome) => {
                advance(&mut stage, ScanStage::Done, &request.url);
                Ok(outcome)
            }
            Err(e) => {
                tracing::warn!(
                    url = %request.url,
                    failed_at = stage.as_str(),
                    error = %e,
                    "Scan failed"
                );
                advance(&mut stage, ScanStage::Failed, &request.url);
                Err(e)
            }
        }
    }

    async fn run_stages(
        &self,
        request: &ScanRequest,
        stage: &mut ScanStage,
    ) -> Result<ScanOutcome, ScanError> {
        let url = normalize_scan_url(&request.url)?;
        let email = normalize_email(request.email.as_deref())?;

        advance(stage, ScanStage::Fetching, url.as_str());
        let html = fetch_html(&self.client, url.as_str(), self.fetch_timeout).await?;

        advance(stage, ScanStage::Extracting, url.as_str());
        let signals = extract_signals(&html, url.as_str());
        tracing::debug!(url = %url, signals = ?signals, "Signals extracted");

        advance(stage, ScanStage::Scoring, url.as_str());
        let strategy = self.strategy;
        let (score, summary) = tokio::join!(
            async { strategy.score(&signals) },
            self.summarizer.summarize(url.as_str(), request.lang, &signals)
        );

        advance(stage, ScanStage::Persisting, url.as_str());
        let record = ScanRecord::new(
            url.as_str(),
            email.clone(),
            request.lang,
            signals,
            summary.clone(),
            score,
        );
        let id = self.store.create(&record)?;

        if let Some(to) = email {
            self.notify(&to, &id).await;
        }

        Ok(ScanOutcome { id, score, summary })
    }

    async fn notify(&self, to: &str, id: &str) {
        let Some(notifier) = &self.notifier else {
            return;
        };

        let report_url = self.report_url(id);
        if let Err(e) = notifier.send_report_ready(to, &report_url).await {
            tracing::warn!(id = %id, error = %e, "Failed to send report-ready email");
        }
    }
}

fn advance(stage: &mut ScanStage, to: ScanStage, url: &str) {
    debug_assert!(
        stage.can_transition_to(to),
        "illegal scan transition {} -> {}",
        stage,
        to
    );
    tracing::info!(url = %url, from = stage.as_str(), to = to.as_str(), "Scan stage");
    *stage = to;
}

/// Trims the optional visitor email; blank counts as absent
fn normalize_email(email: Option<&str>) -> Result<Option<String>, ScanError> {
    let Some(email) = email.map(str::trim).filter(|e| !e.is_empty()) else {
        return Ok(None);
    };

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => {
            Ok(Some(email.to_string()))
        }
        _ => Err(ScanError::Validation(format!(
            "Invalid email address: {}",
            email
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteStorage;

    fn scanner() -> Scanner {
        Scanner::new(Arc::new(SqliteStorage::new_in_memory().unwrap())).unwrap()
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email(None).unwrap(), None);
        assert_eq!(normalize_email(Some("   ")).unwrap(), None);
        assert_eq!(
            normalize_email(Some(" owner@example.com ")).unwrap(),
            Some("owner@example.com".to_string())
        );
        assert!(matches!(
            normalize_email(Some("not-an-email")),
            Err(ScanError::Validation(_))
        ));
    }

    #[test]
    fn test_report_url() {
        let scanner = scanner().with_public_base_url("https://audit.example.fi/");
        assert_eq!(
            scanner.report_url("abc"),
            "https://audit.example.fi/report/abc"
        );
    }

    #[test]
    fn test_error_classes() {
        let validation: ScanError = UrlError::Empty.into();
        assert!(validation.is_client_error());
        assert_eq!(validation.to_string(), "URL is empty");

        let fetch: ScanError = FetchError::HttpStatus {
            url: "https://x.test/".to_string(),
            status: 404,
        }
        .into();
        assert!(fetch.is_client_error());

        let persistence: ScanError = StorageError::Corrupt {
            id: "1".to_string(),
            reason: "bad".to_string(),
        }
        .into();
        assert!(!persistence.is_client_error());
    }

    #[tokio::test]
    async fn test_empty_url_fails_without_storing() {
        let scanner = scanner();
        let result = scanner.scan(ScanRequest::new("   ")).await;

        assert!(matches!(result, Err(ScanError::Validation(_))));
        assert!(scanner.store().list_recent(10).unwrap().is_empty());
    }

    #[test]
    fn test_request_defaults_from_json() {
        let request: ScanRequest = serde_json::from_str(r#"{"url":"example.com"}"#).unwrap();
        assert_eq!(request.lang, Lang::En);
        assert_eq!(request.email, None);

        let request: ScanRequest =
            serde_json::from_str(r#"{"url":"example.com","lang":"fi","email":"a@b.fi"}"#).unwrap();
        assert_eq!(request.lang, Lang::Fi);
        assert_eq!(request.email.as_deref(), Some("a@b.fi"));
    }
}
