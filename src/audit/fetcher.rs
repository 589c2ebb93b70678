//! HTTP fetcher implementation
//!
//! This module handles the single outbound request a scan makes:
//! - Building the shared HTTP client with the identifying user agent
//! - GET of the target page with transparent redirect following
//! - A hard upper bound on the whole request, body included
//! - Error classification (timeout, transport, HTTP status)
//!
//! There are no retries; the caller decides whether to try again.

use crate::config::FetcherConfig;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;

/// Longest time spent establishing a connection
const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Reasons a page fetch can fail
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request did not finish within the allotted time
    #[error("Request to {url} timed out after {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u64 },

    /// Connection, TLS, redirect or body transfer failure
    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    /// The server answered with a non-2xx status
    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },
}

impl FetchError {
    /// Returns true if this failure was a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The fetcher configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use site_audit::audit::build_http_client;
/// use site_audit::config::FetcherConfig;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    let connect_timeout = Duration::from_millis(config.timeout_ms).min(MAX_CONNECT_TIMEOUT);

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .connect_timeout(connect_timeout)
        .redirect(Policy::limited(config.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page and returns its body as text
///
/// # Error Classification
///
/// | Condition | Result |
/// |-----------|--------|
/// | Whole request exceeds `timeout` | `Timeout` (in-flight request dropped) |
/// | Connection refused / DNS / TLS | `Network` |
/// | Too many redirects | `Network` |
/// | Non-2xx final status | `HttpStatus` |
/// | Body cannot be read or decoded | `Network` |
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
/// * `timeout` - Upper bound for the whole request
pub async fn fetch_html(client: &Client, url: &str, timeout: Duration) -> Result<String, FetchError> {
    let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);

    match tokio::time::timeout(timeout, fetch_body(client, url)).await {
        Ok(result) => result.map_err(|e| classify_error(url, timeout_ms, e)),
        Err(_) => Err(FetchError::Timeout {
            url: url.to_string(),
            timeout_ms,
        }),
    }
}

/// Inner request; status errors are raised through `error_for_status`
async fn fetch_body(client: &Client, url: &str) -> Result<String, reqwest::Error> {
    let response = client.get(url).send().await?.error_for_status()?;

    tracing::debug!(
        url = %url,
        final_url = %response.url(),
        status = response.status().as_u16(),
        "page response received"
    );

    response.text().await
}

fn classify_error(url: &str, timeout_ms: u64, error: reqwest::Error) -> FetchError {
    if let Some(status) = error.status() {
        return FetchError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        };
    }

    if error.is_timeout() {
        return FetchError::Timeout {
            url: url.to_string(),
            timeout_ms,
        };
    }

    let message = if error.is_redirect() {
        "Too many redirects".to_string()
    } else if error.is_connect() {
        root_cause(&error)
    } else {
        error.to_string()
    };

    FetchError::Network {
        url: url.to_string(),
        message,
    }
}

/// Message of the innermost error in the source chain
fn root_cause(error: &reqwest::Error) -> String {
    let mut cause: &dyn std::error::Error = error;
    while let Some(source) = cause.source() {
        cause = source;
    }
    cause.to_string()
}
