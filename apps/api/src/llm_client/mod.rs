//! Gateway to the Anthropic Messages API.
//!
//! Job analysis, resume analysis and the optimize-once pass all talk to the
//! model through [`LlmClient`]; nothing else in the crate issues HTTP calls.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// Fixed so scores stay comparable across runs.
pub const MODEL: &str = "claude-sonnet-4-5";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Sampling settings for one call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallOptions {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl CallOptions {
    /// Deterministic extraction of structured records from raw text.
    pub fn analysis() -> Self {
        Self {
            max_tokens: 4096,
            temperature: 0.0,
        }
    }

    /// Free-form rewriting at the temperature of the chosen style.
    pub fn rewriting(temperature: f32, max_tokens: u32) -> Self {
        Self {
            max_tokens,
            temperature,
        }
    }
}

/// Exponential backoff between attempts: `base`, `2 * base`, `4 * base`, ...
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Delay before `attempt` (0-based). The first attempt is immediate.
    pub fn delay_before(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 {
            return None;
        }
        Some(self.base_delay * (1u32 << (attempt - 1).min(16)))
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: [UserMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct UserMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// All text blocks joined in order; `None` when the reply has no text.
    pub fn text(&self) -> Option<String> {
        let parts: Vec<&str> = self
            .content
            .iter()
            .filter(|b| b.block_type == "text")
            .filter_map(|b| b.text.as_deref())
            .filter(|t| !t.trim().is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.concat())
        }
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

/// How a non-success status is handled.
#[derive(Debug)]
enum Failure {
    Retry(LlmError),
    Fatal(LlmError),
}

/// 429 and 5xx are retried; any other error status ends the call. The API's
/// own error message is preferred over the raw body.
fn classify_failure(status: StatusCode, body: String) -> Failure {
    let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    let err = LlmError::Api {
        status: status.as_u16(),
        message,
    };
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        Failure::Retry(err)
    } else {
        Failure::Fatal(err)
    }
}

#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    retry: RetryPolicy,
}

impl LlmClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            retry: RetryPolicy::default(),
        }
    }

    /// Sends one user message and returns the raw reply, retrying transient
    /// failures per the client's [`RetryPolicy`].
    pub async fn call(
        &self,
        prompt: &str,
        system: &str,
        options: CallOptions,
    ) -> Result<LlmResponse, LlmError> {
        let body = MessagesRequest {
            model: MODEL,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
            system,
            messages: [UserMessage {
                role: "user",
                content: prompt,
            }],
        };

        let mut last_error = None;
        for attempt in 0..self.retry.max_attempts {
            if let Some(delay) = self.retry.delay_before(attempt) {
                warn!(
                    "LLM attempt {attempt} failed, retrying in {}ms",
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self
                .client
                .post(ANTHROPIC_API_URL)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&body)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    warn!("LLM transport error: {e}");
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();
            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                match classify_failure(status, text) {
                    Failure::Retry(e) => {
                        warn!("LLM API returned {status}: {e}");
                        last_error = Some(e);
                        continue;
                    }
                    Failure::Fatal(e) => return Err(e),
                }
            }

            let reply: LlmResponse = response.json().await?;
            debug!(
                "LLM call ok (temperature {}): {} in / {} out tokens",
                options.temperature, reply.usage.input_tokens, reply.usage.output_tokens
            );
            return Ok(reply);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: self.retry.max_attempts,
        }))
    }

    /// Calls the model with a JSON-only system prompt and deserializes the
    /// object found in its reply.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        system: &str,
        options: CallOptions,
    ) -> Result<T, LlmError> {
        let system = format!("{system}\n\n{}", prompts::JSON_ONLY_SYSTEM);
        let reply = self.call(prompt, &system, options).await?;
        let text = reply.text().ok_or(LlmError::EmptyContent)?;
        serde_json::from_str(extract_json_object(&text)).map_err(LlmError::Parse)
    }
}

/// The JSON object inside a model reply: code fences are dropped, then the
/// span from the first `{` to the last `}` is kept.
pub fn extract_json_object(text: &str) -> &str {
    let text = strip_code_fence(text);
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}

/// Removes a surrounding ``` fence, including any language tag on its line.
fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let body = match rest.find('\n') {
        Some(newline) if !rest[..newline].contains('{') => &rest[newline + 1..],
        _ => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
