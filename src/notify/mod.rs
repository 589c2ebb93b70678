//! "Report ready" email notifications
//!
//! Notification is optional. When no email API key is configured no
//! notifier is built and scans skip this step silently.

use crate::config::EmailConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Subject line of the report-ready email
pub const REPORT_READY_SUBJECT: &str = "Your website report is ready";

/// Errors from the email service; these are logged, never surfaced
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Email transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Email service returned HTTP {0}")]
    Status(u16),
}

/// Sends the report-ready email
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Emails `to` a link to the finished report
    async fn send_report_ready(&self, to: &str, report_url: &str) -> Result<(), NotifyError>;
}

/// Builds the HTML body of the report-ready email
pub fn report_ready_html(report_url: &str) -> String {
    let url = crate::output::html::escape_html(report_url);
    format!(
        "<p>Your report is ready: <a href=\"{}\">{}</a></p>",
        url, url
    )
}

/// Client for a Resend-compatible `POST /emails` API
pub struct ResendMailer {
    client: Client,
    endpoint: String,
    api_key: String,
    from: String,
}

#[derive(Serialize)]
struct SendEmail<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: String,
}

impl ResendMailer {
    /// Creates a mailer for the configured endpoint
    pub fn new(config: &EmailConfig, api_key: String) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/emails", config.api_base.trim_end_matches('/')),
            api_key,
            from: config.from.clone(),
        })
    }

    /// Creates a mailer when an API key is present in the environment
    pub fn from_config(config: &EmailConfig) -> Result<Option<Self>, reqwest::Error> {
        match config.api_key() {
            Some(key) => Self::new(config, key).map(Some),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl EmailSender for ResendMailer {
    async fn send_report_ready(&self, to: &str, report_url: &str) -> Result<(), NotifyError> {
        let body = SendEmail {
            from: &self.from,
            to: [to],
            subject: REPORT_READY_SUBJECT,
            html: report_ready_html(report_url),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status(status.as_u16()));
        }

        tracing::debug!(to = %to, "Report-ready email accepted");
        Ok(())
    }
}
