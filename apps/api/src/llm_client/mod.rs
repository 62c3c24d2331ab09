//! LLM Client: the single point of entry for all chat-completion calls in applymail.
//!
//! ARCHITECTURAL RULE: No other module may talk to the completion service directly.
//! Extraction and drafting go through the `CompletionService` trait implemented here.
//!
//! Any OpenAI-compatible `/chat/completions` endpoint works; Groq is the default.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

pub const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
/// Total attempts for a rate-limited call (first try plus three retries).
pub const MAX_ATTEMPTS: u32 = 4;
const RATE_LIMITED: u16 = 429;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM configuration error: {0}")]
    Configuration(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Everything the client needs, passed in explicitly. The client never reads the environment.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    pub api_url: String,
    pub timeout: Duration,
    /// First backoff delay after a 429; doubles on every further retry.
    pub backoff_unit: Duration,
}

impl LlmConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(120),
            backoff_unit: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Text of the first choice, if it carries any non-blank content.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.content.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// A text-completion service: system + user prompt in, generated text out.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        temperature: f32,
    ) -> Result<String, LlmError>;
}

/// The single completion client used by all services in applymail.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    config: LlmConfig,
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("model", &self.config.model)
            .field("api_url", &self.config.api_url)
            .finish_non_exhaustive()
    }
}

impl LlmClient {
    /// Fails with `LlmError::Configuration` when the API key is blank.
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        if config.api_key.trim().is_empty() {
            return Err(LlmError::Configuration(
                "completion API key is missing".to_string(),
            ));
        }
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Makes a raw chat-completion call, returning the full response object.
    ///
    /// Only 429 is retried: up to `MAX_ATTEMPTS` attempts, sleeping 1, 2, 4 backoff units
    /// between them. Every other HTTP status and every transport error fails immediately.
    pub async fn call(
        &self,
        system: &str,
        prompt: &str,
        temperature: f32,
    ) -> Result<ChatResponse, LlmError> {
        let request_body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature,
        };

        let mut attempt = 0;
        loop {
            let response = self
                .client
                .post(&self.config.api_url)
                .bearer_auth(&self.config.api_key)
                .json(&request_body)
                .send()
                .await?;

            let status = response.status();

            if status.is_success() {
                let body = response.text().await?;
                let chat: ChatResponse =
                    serde_json::from_str(&body).map_err(|e| LlmError::Api {
                        status: status.as_u16(),
                        message: format!("malformed completion body: {e}"),
                    })?;
                if let Some(usage) = &chat.usage {
                    debug!(
                        "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                        usage.prompt_tokens, usage.completion_tokens
                    );
                }
                return Ok(chat);
            }

            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == RATE_LIMITED && attempt + 1 < MAX_ATTEMPTS {
                let delay = backoff_delay(self.config.backoff_unit, attempt);
                warn!(
                    "LLM API rate limited (attempt {}/{}), retrying after {}ms",
                    attempt + 1,
                    MAX_ATTEMPTS,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
                continue;
            }

            warn!("LLM API returned {}: {}", status, body);
            // Prefer the structured error message when the service sends one.
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }
    }
}

#[async_trait]
impl CompletionService for LlmClient {
    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        temperature: f32,
    ) -> Result<String, LlmError> {
        let response = self.call(system, prompt, temperature).await?;
        response
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }
}

/// Delay before retry number `attempt + 1`: unit, 2×unit, 4×unit, ...
pub fn backoff_delay(unit: Duration, attempt: u32) -> Duration {
    unit * 2u32.pow(attempt)
}

/// Returns the contents of the first fenced block (```json ... ``` or ``` ... ```) in LLM
/// output, wherever it starts. Text without a fence comes back trimmed.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(open) = text.find("```") else {
        return text;
    };
    let mut inner = &text[open + 3..];
    // Skip a language tag such as `json` on the opening fence line.
    if let Some((tag, rest)) = inner.split_once('\n') {
        if tag.trim().chars().all(|c| c.is_ascii_alphanumeric()) {
            inner = rest;
        }
    }
    match inner.find("```") {
        Some(close) => inner[..close].trim(),
        None => inner.trim(),
    }
}
