//! Fallback-aware chat completion client.
//!
//! [`CompletionClient`] walks an ordered model list (`[primary] ++ fallbacks`,
//! or just the caller's model) and gives every model a bounded number of
//! attempts:
//!
//! - success → return immediately
//! - HTTP 429 → wait `2^attempt` seconds (1, 2, 4, ...) and retry; after the
//!   last attempt's wait, move on to the next model
//! - any other failure → on the last attempt move on without waiting,
//!   otherwise wait 1 second and retry
//!
//! When every model is exhausted the outcome is [`ChatOutcome::Exhausted`];
//! [`CompletionClient::chat`] renders that as [`UNAVAILABLE_MESSAGE`] and
//! never returns an error.
//!
//! Network and clock are behind the [`ChatTransport`] and [`Sleeper`] traits.

use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::{
    config::completion_config::CompletionConfig, error_handler::AiLlmError,
    services::open_ai_service::OpenAiService,
};

/// Returned by [`CompletionClient::chat`] when every model failed.
pub const UNAVAILABLE_MESSAGE: &str =
    "🚫 All language models are currently unavailable. Please try again later.";

const TEST_PROMPT: &str = "Hello, this is a test message. Please respond with 'Test successful!'";
const TEST_MAX_TOKENS: u32 = 50;
const RETRY_PAUSE: Duration = Duration::from_secs(1);

/// One chat message on the wire.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

/// Body of `POST /v1/chat/completions`, built once per attempt.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

/// Per-call overrides.
///
/// `None` means "use the configured default". Any explicit value, including
/// `Some(0)` and `Some(0.0)`, is sent as given. A blank model is treated as
/// unset.
#[derive(Debug, Clone, Default)]
pub struct ChatOverrides {
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

/// Typed result of a completion run.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatOutcome {
    Answered {
        model: String,
        text: String,
        /// `true` when a model other than the first in the list answered.
        fallback_used: bool,
    },
    Exhausted,
}

impl ChatOutcome {
    /// Answer text, or [`UNAVAILABLE_MESSAGE`] when exhausted.
    pub fn into_text(self) -> String {
        match self {
            ChatOutcome::Answered { text, .. } => text,
            ChatOutcome::Exhausted => UNAVAILABLE_MESSAGE.to_string(),
        }
    }
}

/// Result of [`CompletionClient::test_connection`].
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionReport {
    pub ok: bool,
    pub message: String,
    pub response: Option<String>,
    pub model: Option<String>,
}

/// A single HTTP attempt against a chat completion API.
pub trait ChatTransport: Send + Sync {
    fn send<'a>(
        &'a self,
        request: &'a ChatRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String, AiLlmError>> + Send + 'a>>;
}

/// Waits between attempts.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;
}

/// [`Sleeper`] backed by `tokio::time::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(tokio::time::sleep(duration))
    }
}

/// Chat completion client with ordered model fallback and bounded retries.
///
/// Construct once and share behind an `Arc`; it holds no per-request state.
pub struct CompletionClient {
    cfg: CompletionConfig,
    system_prompt: Option<String>,
    transport: Arc<dyn ChatTransport>,
    sleeper: Arc<dyn Sleeper>,
}

impl CompletionClient {
    /// Builds a client talking to the configured endpoint over HTTP.
    ///
    /// # Errors
    /// Propagates [`OpenAiService::new`] failures (missing key, bad endpoint).
    pub fn new(cfg: CompletionConfig) -> Result<Self, AiLlmError> {
        let transport = Arc::new(OpenAiService::new(&cfg.chat)?);
        info!(
            primary = %cfg.chat.model,
            fallbacks = ?cfg.fallback_models,
            max_retries = cfg.max_retries,
            "CompletionClient initialized"
        );
        Ok(Self::with_transport(cfg, transport, Arc::new(TokioSleeper)))
    }

    /// Builds a client over any transport/sleeper pair.
    pub fn with_transport(
        cfg: CompletionConfig,
        transport: Arc<dyn ChatTransport>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            cfg,
            system_prompt: None,
            transport,
            sleeper,
        }
    }

    /// Sets the system message sent before every user prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Ordered model list used when no model override is given.
    pub fn available_models(&self) -> Vec<String> {
        self.cfg.models()
    }

    pub fn config(&self) -> &CompletionConfig {
        &self.cfg
    }

    /// Runs the fallback/retry policy and renders the outcome as text.
    pub async fn chat(&self, prompt: &str, overrides: &ChatOverrides) -> String {
        self.complete(prompt, overrides).await.into_text()
    }

    /// Runs the fallback/retry policy and reports which model answered.
    pub async fn complete(&self, prompt: &str, overrides: &ChatOverrides) -> ChatOutcome {
        let models = self.attempt_order(overrides);
        let max_retries = self.cfg.max_retries.max(1);
        let max_tokens = overrides.max_tokens.unwrap_or_else(|| self.cfg.max_tokens());
        let temperature = overrides
            .temperature
            .unwrap_or_else(|| self.cfg.temperature());

        for (index, model) in models.iter().enumerate() {
            if index > 0 {
                warn!(model = %model, "switching to fallback model");
            }

            let request = self.build_request(model, prompt, max_tokens, temperature);

            for attempt in 0..max_retries {
                let last = attempt + 1 == max_retries;
                debug!(model = %model, attempt = attempt + 1, max_retries, "chat attempt");

                match self.transport.send(&request).await {
                    Ok(text) => {
                        info!(
                            model = %model,
                            attempt = attempt + 1,
                            fallback_used = index > 0,
                            "chat completion answered"
                        );
                        return ChatOutcome::Answered {
                            model: model.clone(),
                            text,
                            fallback_used: index > 0,
                        };
                    }
                    Err(err) if err.is_rate_limited() => {
                        let wait = backoff(attempt);
                        warn!(
                            model = %model,
                            attempt = attempt + 1,
                            wait_secs = wait.as_secs(),
                            "rate limited, backing off"
                        );
                        self.sleeper.sleep(wait).await;
                    }
                    Err(err) => {
                        warn!(
                            model = %model,
                            attempt = attempt + 1,
                            error = %err,
                            "chat attempt failed"
                        );
                        if last {
                            break;
                        }
                        self.sleeper.sleep(RETRY_PAUSE).await;
                    }
                }
            }
        }

        error!(models = ?models, "all language models exhausted");
        ChatOutcome::Exhausted
    }

    /// Sends the fixed probe prompt with `max_tokens = 50`.
    pub async fn test_connection(&self) -> ConnectionReport {
        let overrides = ChatOverrides {
            max_tokens: Some(TEST_MAX_TOKENS),
            ..ChatOverrides::default()
        };
        match self.complete(TEST_PROMPT, &overrides).await {
            ChatOutcome::Answered { model, text, .. } => ConnectionReport {
                ok: true,
                message: "Groq API connection successful".into(),
                response: Some(text),
                model: Some(model),
            },
            ChatOutcome::Exhausted => ConnectionReport {
                ok: false,
                message: UNAVAILABLE_MESSAGE.into(),
                response: None,
                model: None,
            },
        }
    }

    fn attempt_order(&self, overrides: &ChatOverrides) -> Vec<String> {
        match overrides.model.as_deref().map(str::trim) {
            Some(model) if !model.is_empty() => vec![model.to_string()],
            _ => self.cfg.models(),
        }
    }

    fn build_request(
        &self,
        model: &str,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> ChatRequest {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &self.system_prompt {
            messages.push(ChatMessage::system(system.clone()));
        }
        messages.push(ChatMessage::user(prompt));

        ChatRequest {
            model: model.to_string(),
            messages,
            max_tokens,
            temperature,
            top_p: self.cfg.top_p(),
        }
    }
}

/// `2^attempt` seconds, capped to keep the shift in range.
fn backoff(attempt: u32) -> Duration {
    Duration::from_secs(1u64 << attempt.min(16))
}
