//! Parenting assistant bridge.
//!
//! Sends one question plus a short description of the active child to a
//! hosted chat-completions endpoint (Groq by default) and returns the
//! answer. Failures come back as a typed [`LlmError`]; [`reply_text`] turns
//! either outcome into the line shown to the parent.

use std::fmt;
use std::time::Duration;

use babysteps_core::Locale;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default request timeout for API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
pub const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
const ASSISTANT_MAX_TOKENS: u32 = 1024;
const ASSISTANT_TEMPERATURE: f32 = 0.5;

/// Assistant bridge errors.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The provided API key was missing or blank.
    #[error("invalid API key: {reason}")]
    InvalidApiKey { reason: &'static str },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// API returned an error response.
    #[error("API error: {message}")]
    Api { message: String },
    /// Failed to parse response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    /// The model answered with nothing.
    #[error("empty answer")]
    EmptyAnswer,
}

/// Coarse failure classes, as far as the parent is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    MissingKey,
    EmptyAnswer,
    Unavailable,
}

impl LlmError {
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidApiKey { .. } => FailureKind::MissingKey,
            Self::EmptyAnswer => FailureKind::EmptyAnswer,
            Self::ClientBuild(_) | Self::Request(_) | Self::Api { .. } | Self::InvalidResponse(_) => {
                FailureKind::Unavailable
            }
        }
    }
}

/// Chat-completions client.
///
/// # Thread Safety
///
/// The client is safe to clone and share across threads. Each clone shares
/// the underlying HTTP connection pool.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    api_key: String,
    api_url: String,
    model: String,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("api_key", &"[REDACTED]")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a new client with the given API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty or whitespace-only, or if
    /// the HTTP client fails to build.
    pub fn new(api_key: impl Into<String>) -> Result<Self, LlmError> {
        let api_key = api_key.into();

        if api_key.is_empty() {
            return Err(LlmError::InvalidApiKey {
                reason: "API key cannot be empty",
            });
        }
        if api_key.trim().is_empty() {
            return Err(LlmError::InvalidApiKey {
                reason: "API key cannot be whitespace-only",
            });
        }

        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(LlmError::ClientBuild)?;

        Ok(Self {
            http,
            api_key,
            api_url: GROQ_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        })
    }

    /// Points the client at another OpenAI-compatible endpoint.
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Asks one parenting question. `context` describes the active child,
    /// see `babysteps_core::assistant::assistant_context`.
    pub async fn ask(&self, question: &str, context: &str) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: self.model.clone(),
            max_tokens: ASSISTANT_MAX_TOKENS,
            temperature: ASSISTANT_TEMPERATURE,
            messages: vec![
                Message {
                    role: "system",
                    content: build_system_prompt(context),
                },
                Message {
                    role: "user",
                    content: question.to_string(),
                },
            ],
        };

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(parse_api_error(&body).unwrap_or_else(|| LlmError::Api {
                message: format!("status {status}: {body}"),
            }));
        }

        let payload: ChatResponse = serde_json::from_str(&body)
            .map_err(|err| LlmError::InvalidResponse(err.to_string()))?;
        extract_answer(payload)
    }
}

/// Turns the outcome of [`Client::ask`] into the assistant's chat line.
#[must_use]
pub fn reply_text(result: Result<String, LlmError>, locale: Locale) -> String {
    match result {
        Ok(answer) => answer,
        Err(err) => {
            tracing::warn!(error = %err, "assistant request failed");
            match err.kind() {
                FailureKind::MissingKey => locale.assistant_missing_key().to_string(),
                FailureKind::EmptyAnswer => locale.assistant_empty_answer().to_string(),
                FailureKind::Unavailable => locale.assistant_apology().to_string(),
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

fn extract_answer(payload: ChatResponse) -> Result<String, LlmError> {
    payload
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|text| !text.trim().is_empty())
        .ok_or(LlmError::EmptyAnswer)
}

fn parse_api_error(body: &str) -> Option<LlmError> {
    #[derive(Deserialize)]
    struct ErrorPayload {
        error: ErrorDetails,
    }

    #[derive(Deserialize)]
    struct ErrorDetails {
        message: String,
    }

    serde_json::from_str::<ErrorPayload>(body)
        .ok()
        .map(|payload| LlmError::Api {
            message: payload.error.message,
        })
}

fn build_system_prompt(context: &str) -> String {
    let lines = [
        "You are a helpful, empathetic parenting assistant (pediatric expert).".to_string(),
        format!("Context about the baby: {context}."),
        String::new(),
        "Detect the language of the user's message (Uzbek, Russian, or English).".to_string(),
        "- If the user asks in Uzbek, answer in Uzbek.".to_string(),
        "- If the user asks in Russian, answer in Russian.".to_string(),
        "- If the user asks in English, answer in English.".to_string(),
        String::new(),
        "Answer in the exact same language as the user's question. Keep it short, helpful and supportive."
            .to_string(),
    ];
    lines.join("\n")
}
