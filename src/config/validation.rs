use crate::config::types::{
    AdminConfig, Config, EmailConfig, FetcherConfig, ServerConfig, StorageConfig, SummarizerConfig,
};
use crate::ConfigError;
use std::net::SocketAddr;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_server_config(&config.server)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_storage_config(&config.storage)?;
    validate_summarizer_config(&config.summarizer)?;
    validate_admin_config(&config.admin)?;
    validate_email_config(&config.email)?;
    Ok(())
}

/// Validates server configuration
fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    config.bind.parse::<SocketAddr>().map_err(|e| {
        ConfigError::Validation(format!("bind must be a socket address, got '{}': {}", config.bind, e))
    })?;

    validate_http_url("public-base-url", &config.public_base_url)?;

    if config.export_limit < 1 || config.export_limit > 1000 {
        return Err(ConfigError::Validation(format!(
            "export-limit must be between 1 and 1000, got {}",
            config.export_limit
        )));
    }

    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_ms < 100 || config.timeout_ms > 120_000 {
        return Err(ConfigError::Validation(format!(
            "fetcher timeout-ms must be between 100 and 120000, got {}",
            config.timeout_ms
        )));
    }

    if config.max_redirects > 20 {
        return Err(ConfigError::Validation(format!(
            "max-redirects must be <= 20, got {}",
            config.max_redirects
        )));
    }

    Ok(())
}

/// Validates storage configuration
fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates text-generation configuration
fn validate_summarizer_config(config: &SummarizerConfig) -> Result<(), ConfigError> {
    validate_http_url("summarizer api-base", &config.api_base)?;

    if config.model.trim().is_empty() {
        return Err(ConfigError::Validation("model cannot be empty".to_string()));
    }

    if !(0.0..=2.0).contains(&config.temperature) {
        return Err(ConfigError::Validation(format!(
            "temperature must be between 0.0 and 2.0, got {}",
            config.temperature
        )));
    }

    if config.timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "summarizer timeout-ms must be >= 100, got {}",
            config.timeout_ms
        )));
    }

    validate_env_name("summarizer api-key-env", &config.api_key_env)
}

/// Validates admin configuration
fn validate_admin_config(config: &AdminConfig) -> Result<(), ConfigError> {
    validate_env_name("admin username-env", &config.username_env)?;
    validate_env_name("admin password-env", &config.password_env)
}

/// Validates email configuration
fn validate_email_config(config: &EmailConfig) -> Result<(), ConfigError> {
    validate_http_url("email api-base", &config.api_base)?;
    validate_email(sender_address(&config.from))?;

    if config.timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "email timeout-ms must be >= 100, got {}",
            config.timeout_ms
        )));
    }

    validate_env_name("email api-key-env", &config.api_key_env)
}

fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {}: {}", field, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} must use http or https, got '{}'",
            field, value
        )));
    }

    Ok(())
}

fn validate_env_name(field: &str, name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::Validation(format!("{} cannot be empty", field)));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ConfigError::Validation(format!(
            "{} must contain only ASCII letters, digits and underscores, got '{}'",
            field, name
        )));
    }

    Ok(())
}

/// Extracts the address from `Display Name <addr@host>` or returns the input
fn sender_address(from: &str) -> &str {
    match (from.find('<'), from.rfind('>')) {
        (Some(start), Some(end)) if start < end => from[start + 1..end].trim(),
        _ => from.trim(),
    }
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "sender email cannot be empty".to_string(),
        ));
    }

    let (local, domain) = email.split_once('@').ok_or_else(|| {
        ConfigError::Validation(format!("Invalid email format: '{}'", email))
    })?;

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
