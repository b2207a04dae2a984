//! # HTTP Model Client
//!
//! Chat-completions client over `reqwest`. One shared client with the
//! bearer token in default headers and a hard per-request timeout;
//! `complete` maps every transport and shape failure onto
//! [`ModelError`] so the pipeline can log precisely what went wrong.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::{CompletionRequest, ModelClient};
use crate::error::ModelError;

/// Environment variable carrying the model API base URL.
pub const ENV_BASE_URL: &str = "VERDEX_MODEL_BASE_URL";
/// Environment variable carrying the bearer token.
pub const ENV_API_KEY: &str = "VERDEX_MODEL_API_KEY";
/// Environment variable carrying the model name.
pub const ENV_MODEL_NAME: &str = "VERDEX_MODEL_NAME";
/// Environment variable overriding the request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "VERDEX_MODEL_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for [`HttpModelClient`].
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Base URL of the chat-completions API.
    pub base_url: String,
    /// Bearer token.
    pub api_key: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Request timeout in seconds (default: 30).
    pub timeout_secs: u64,
}

impl ModelConfig {
    /// Create a configuration with the default timeout.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Read the configuration from `VERDEX_MODEL_*` environment
    /// variables.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Config`] when a required variable is
    /// missing or the timeout override is not a positive integer.
    pub fn from_env() -> Result<Self, ModelError> {
        let require = |name: &str| {
            std::env::var(name).map_err(|_| ModelError::Config {
                reason: format!("{name} is not set"),
            })
        };
        let mut config = Self::new(
            require(ENV_BASE_URL)?,
            require(ENV_API_KEY)?,
            require(ENV_MODEL_NAME)?,
        );
        if let Ok(raw) = std::env::var(ENV_TIMEOUT_SECS) {
            config.timeout_secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ModelError::Config {
                    reason: format!("{ENV_TIMEOUT_SECS} must be a positive integer, got {raw:?}"),
                })?;
        }
        Ok(config)
    }
}

/// Chat-completions client.
#[derive(Debug)]
pub struct HttpModelClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    timeout_secs: u64,
}

impl HttpModelClient {
    /// Build the client: validate the base URL, install the bearer
    /// token as a default header, and fix the request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Config`] for an invalid URL or an API key
    /// with characters a header cannot carry.
    pub fn new(config: ModelConfig) -> Result<Self, ModelError> {
        url::Url::parse(&config.base_url).map_err(|e| ModelError::Config {
            reason: format!("invalid base URL {:?}: {e}", config.base_url),
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::AUTHORIZATION,
                    reqwest::header::HeaderValue::from_str(&format!("Bearer {}", config.api_key))
                        .map_err(|_| ModelError::Config {
                            reason: "invalid API key characters".into(),
                        })?,
                );
                headers.insert(
                    reqwest::header::CONTENT_TYPE,
                    reqwest::header::HeaderValue::from_static("application/json"),
                );
                headers
            })
            .build()
            .map_err(|e| ModelError::Config {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model,
            timeout_secs: config.timeout_secs,
        })
    }
}

#[derive(Debug, Serialize)]
struct ChatBody<'a> {
    model: &'a str,
    messages: [ChatTurn<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatTurn<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl ModelClient for HttpModelClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ModelError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatBody {
            model: &self.model,
            messages: [
                ChatTurn {
                    role: "system",
                    content: &request.system,
                },
                ChatTurn {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self.client.post(&url).json(&body).send().await.map_err(|e| {
            if e.is_timeout() {
                ModelError::Timeout {
                    limit_secs: self.timeout_secs,
                }
            } else {
                ModelError::Unavailable {
                    reason: format!("request failed: {e}"),
                }
            }
        })?;

        let status = response.status();
        if status.is_server_error() {
            let excerpt = body_excerpt(response).await;
            return Err(ModelError::Unavailable {
                reason: format!("HTTP {status}: {excerpt}"),
            });
        }
        if !status.is_success() {
            let excerpt = body_excerpt(response).await;
            return Err(ModelError::Rejected {
                status: status.as_u16(),
                detail: excerpt,
            });
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| ModelError::Malformed {
            reason: format!("response deserialization failed: {e}"),
        })?;
        let choice = parsed.choices.into_iter().next().ok_or(ModelError::Malformed {
            reason: "response carried no choices".into(),
        })?;
        match choice.message.content {
            Some(content) if !content.trim().is_empty() => Ok(content),
            _ => Err(ModelError::Empty),
        }
    }

    fn client_name(&self) -> &str {
        &self.model
    }
}

/// First few hundred bytes of an error body, for diagnostics.
async fn body_excerpt(response: reqwest::Response) -> String {
    const LIMIT: usize = 240;
    let text = response.text().await.unwrap_or_default();
    let trimmed = text.trim();
    if trimmed.len() <= LIMIT {
        trimmed.to_string()
    } else {
        let mut cut = LIMIT;
        while !trimmed.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}...", &trimmed[..cut])
    }
}
