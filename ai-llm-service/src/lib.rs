//! Shared LLM layer for the Harry Potter RAG assistant.
//!
//! - [`completion::CompletionClient`] drives chat completions against an
//!   OpenAI-compatible API (Groq) with an ordered model fallback list,
//!   bounded per-model retries and exponential backoff on rate limiting.
//! - [`services::ollama_service::OllamaService`] produces query embeddings.
//! - [`health_service::HealthService`] offers non-failing provider probes.
//! - [`telemetry`] exposes a library-scoped `tracing` layer.

pub mod completion;
pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod services;
pub mod telemetry;

pub use completion::{
    ChatOutcome, ChatOverrides, ChatTransport, CompletionClient, ConnectionReport, Sleeper,
    TokioSleeper, UNAVAILABLE_MESSAGE,
};
pub use config::{
    completion_config::CompletionConfig, llm_model_config::LlmModelConfig,
    llm_provider::LlmProvider,
};
pub use error_handler::{AiLlmError, ConfigError, Result};
