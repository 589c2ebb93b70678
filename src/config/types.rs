use crate::audit::ScoringStrategy;
use serde::Deserialize;

/// Main configuration structure for Site-Audit
///
/// Every section is optional; omitted sections take their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub fetcher: FetcherConfig,
    pub storage: StorageConfig,
    pub scoring: ScoringConfig,
    pub summarizer: SummarizerConfig,
    pub admin: AdminConfig,
    pub email: EmailConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind: String,

    /// Externally visible base URL, used for links in emails
    pub public_base_url: String,

    /// Maximum number of rows shown on the admin page and in CSV exports
    pub export_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
            public_base_url: "http://localhost:3000".to_string(),
            export_limit: 50,
        }
    }
}

/// Page fetcher configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FetcherConfig {
    /// User-Agent header sent with every page request
    pub user_agent: String,

    /// Upper bound for one page fetch, body included (milliseconds)
    pub timeout_ms: u64,

    /// Maximum number of redirects followed per fetch
    pub max_redirects: usize,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: "AI Website Assistant/1.0 (+https://example.com)".to_string(),
            timeout_ms: 15_000,
            max_redirects: 10,
        }
    }
}

/// Report store configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct StorageConfig {
    /// Path to the SQLite database file
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: "./site-audit.db".to_string(),
        }
    }
}

/// Scoring configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ScoringConfig {
    /// Which scoring formula new scans use
    pub strategy: ScoringStrategy,
}

/// Text-generation service configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SummarizerConfig {
    /// Base URL of an OpenAI-compatible API
    pub api_base: String,

    /// Model name sent with each request
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Upper bound for one generation call (milliseconds)
    pub timeout_ms: u64,

    /// Environment variable holding the API key
    pub api_key_env: String,
}

impl SummarizerConfig {
    /// Reads the API key from the environment; blank values count as missing
    pub fn api_key(&self) -> Option<String> {
        read_env(&self.api_key_env)
    }
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-4.1-mini".to_string(),
            temperature: 0.2,
            timeout_ms: 30_000,
            api_key_env: "OPENAI_API_KEY".to_string(),
        }
    }
}

/// Admin view configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AdminConfig {
    /// Environment variable holding the Basic auth user name
    pub username_env: String,

    /// Environment variable holding the Basic auth password
    pub password_env: String,
}

impl AdminConfig {
    /// Returns the admin credentials when both are set
    pub fn credentials(&self) -> Option<(String, String)> {
        Some((read_env(&self.username_env)?, read_env(&self.password_env)?))
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username_env: "BASIC_AUTH_USER".to_string(),
            password_env: "BASIC_AUTH_PASS".to_string(),
        }
    }
}

/// Outbound email configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EmailConfig {
    /// Base URL of the Resend-compatible email API
    pub api_base: String,

    /// Sender address, optionally with a display name
    pub from: String,

    /// Upper bound for one send call (milliseconds)
    pub timeout_ms: u64,

    /// Environment variable holding the API key
    pub api_key_env: String,
}

impl EmailConfig {
    /// Reads the API key from the environment; blank values count as missing
    pub fn api_key(&self) -> Option<String> {
        read_env(&self.api_key_env)
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.resend.com".to_string(),
            from: "AI Website Assistant <noreply@yourdomain.test>".to_string(),
            timeout_ms: 10_000,
            api_key_env: "RESEND_API_KEY".to_string(),
        }
    }
}

fn read_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
