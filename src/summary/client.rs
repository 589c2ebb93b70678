//! Text-generation collaborator
//!
//! The summarizer only depends on the [`TextGenerator`] trait. The shipped
//! implementation talks to an OpenAI-compatible chat completions endpoint.

use crate::audit::Signals;
use crate::config::SummarizerConfig;
use crate::summary::Lang;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// System instruction sent with every generation request
pub const SYSTEM_ROLE: &str =
    "You are a website audit assistant for Finnish small businesses. Be concise, concrete, and practical.";

/// Output contract prepended to the user message
pub const JSON_INSTRUCTION: &str = "Return only valid JSON with keys {\"good\":[], \"issues\":[], \"steps\":[]} and limits: good<=4, issues<=6, steps=3. Use the specified language.";

/// Errors from the text-generation service
///
/// None of these reach the visitor; the summarizer recovers from all of them.
#[derive(Debug, Error)]
pub enum SummaryServiceError {
    #[error("No API key configured")]
    MissingCredential,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Service returned HTTP {0}")]
    Status(u16),

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Generation timed out after {0}ms")]
    Timeout(u64),
}

/// One summary generation request
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    pub system_role: String,
    pub lang: Lang,
    pub url: String,
    pub signals: Signals,
}

/// Payload serialized into the user message
#[derive(Serialize)]
struct UserPayload<'a> {
    lang: Lang,
    url: &'a str,
    signals: &'a Signals,
}

impl GenerationRequest {
    /// Creates a request carrying the fixed system role
    pub fn new(url: &str, lang: Lang, signals: &Signals) -> Self {
        Self {
            system_role: SYSTEM_ROLE.to_string(),
            lang,
            url: url.to_string(),
            signals: signals.clone(),
        }
    }

    /// Builds the user message: the JSON-only instruction followed by the
    /// serialized `{lang, url, signals}` payload
    pub fn user_message(&self) -> Result<String, SummaryServiceError> {
        let payload = UserPayload {
            lang: self.lang,
            url: &self.url,
            signals: &self.signals,
        };
        let payload = serde_json::to_string(&payload)
            .map_err(|e| SummaryServiceError::Malformed(e.to_string()))?;
        Ok(format!("{}\n{}", JSON_INSTRUCTION, payload))
    }
}

/// A service that turns a generation request into raw JSON text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the model's message content, expected to be a JSON object
    async fn generate(&self, request: &GenerationRequest) -> Result<String, SummaryServiceError>;
}

/// OpenAI-compatible chat completions client
pub struct OpenAiClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    response_format: ResponseFormat,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

impl OpenAiClient {
    /// Creates a client for the configured endpoint
    pub fn new(config: &SummarizerConfig, api_key: String) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.api_base.trim_end_matches('/')),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    /// Creates a client when an API key is present in the environment
    ///
    /// Returns `Ok(None)` when the key is missing, which callers treat as
    /// "use the fallback summary".
    pub fn from_config(config: &SummarizerConfig) -> Result<Option<Self>, reqwest::Error> {
        match config.api_key() {
            Some(key) => Self::new(config, key).map(Some),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, SummaryServiceError> {
        if self.api_key.is_empty() {
            return Err(SummaryServiceError::MissingCredential);
        }

        let user_message = request.user_message()?;
        let body = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            response_format: ResponseFormat {
                kind: "json_object",
            },
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system_role,
                },
                ChatMessage {
                    role: "user",
                    content: &user_message,
                },
            ],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SummaryServiceError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SummaryServiceError::Status(status.as_u16()));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| SummaryServiceError::Malformed(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| SummaryServiceError::Malformed("no message content".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_layout() {
        let signals = Signals {
            has_https: true,
            ..Signals::default()
        };
        let request = GenerationRequest::new("https://example.com/", Lang::Fi, &signals);
        let message = request.user_message().unwrap();

        let (instruction, payload) = message.split_once('\n').unwrap();
        assert_eq!(instruction, JSON_INSTRUCTION);

        let payload: serde_json::Value = serde_json::from_str(payload).unwrap();
        assert_eq!(payload["lang"], "fi");
        assert_eq!(payload["url"], "https://example.com/");
        assert_eq!(payload["signals"]["hasHTTPS"], true);
    }

    #[test]
    fn test_request_carries_system_role() {
        let request = GenerationRequest::new("https://example.com/", Lang::En, &Signals::default());
        assert_eq!(request.system_role, SYSTEM_ROLE);
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let config = SummarizerConfig {
            api_base: "https://api.example.com/v1/".to_string(),
            ..SummarizerConfig::default()
        };
        let client = OpenAiClient::new(&config, "key".to_string()).unwrap();
        assert_eq!(client.endpoint, "https://api.example.com/v1/chat/completions");
    }

    #[test]
    fn test_missing_key_yields_no_client() {
        let config = SummarizerConfig {
            api_key_env: "SITE_AUDIT_TEST_UNSET_KEY".to_string(),
            ..SummarizerConfig::default()
        };
        assert!(OpenAiClient::from_config(&config).unwrap().is_none());
    }
}
