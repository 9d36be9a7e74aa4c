//! Default LLM configs loaded from environment variables.
//!
//! Two roles are wired here:
//!
//! - **Chat** → Groq chat completions (primary model + ordered fallbacks)
//! - **Embedding** → Ollama embedding generator for query vectors
//!
//! # Environment variables
//!
//! Chat:
//! - `GROQ_API_KEY`        = bearer credential (mandatory)
//! - `GROQ_URL`            = base URL (default `https://api.groq.com/openai`)
//! - `LLM_MODEL`           = primary model
//! - `LLM_FALLBACK_MODELS` = comma-separated fallback models
//! - `LLM_MAX_TOKENS`, `LLM_TEMPERATURE`, `LLM_TOP_P`
//! - `LLM_TIMEOUT_SECS`, `LLM_MAX_RETRIES`
//!
//! Embedding:
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint (default `http://localhost:11434`)
//! - `EMBEDDING_MODEL`             = embedding model (default `all-minilm`)
//! - `EMBEDDING_NORMALIZE`         = L2-normalize vectors (default `true`)

use crate::{
    config::{
        completion_config::CompletionConfig, llm_model_config::LlmModelConfig,
        llm_provider::LlmProvider,
    },
    error_handler::{
        AiLlmError, ConfigError, env_bool, env_list, env_opt_f32, env_opt_u32, env_opt_u64,
        env_or, must_env,
    },
};

pub const DEFAULT_GROQ_URL: &str = "https://api.groq.com/openai";
pub const DEFAULT_CHAT_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_FALLBACK_MODELS: [&str; 3] =
    ["mixtral-8x7b-32768", "llama3-8b-8192", "llama2-70b-4096"];
pub const DEFAULT_MAX_TOKENS: u32 = 1500;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TOP_P: f32 = 0.9;
pub const DEFAULT_TIMEOUT_SECS: u64 = 45;
pub const DEFAULT_MAX_RETRIES: u32 = 3;

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
/// Ollama name of `all-MiniLM-L6-v2` (384 dimensions).
pub const DEFAULT_EMBEDDING_MODEL: &str = "all-minilm";

/// Resolves the Ollama endpoint from environment.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
/// 3. [`DEFAULT_OLLAMA_URL`]
///
/// # Errors
///
/// - [`ConfigError::InvalidNumber`] if `OLLAMA_PORT` is invalid
fn ollama_endpoint() -> Result<String, AiLlmError> {
    if let Ok(url) = std::env::var("OLLAMA_URL") {
        if !url.trim().is_empty() {
            return Ok(url.trim().to_string());
        }
    }
    if let Ok(port) = std::env::var("OLLAMA_PORT") {
        if !port.trim().is_empty() {
            let port = port
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidNumber {
                    var: "OLLAMA_PORT",
                    reason: "expected u16 (1..=65535)",
                })?;
            return Ok(format!("http://localhost:{port}"));
        }
    }
    Ok(DEFAULT_OLLAMA_URL.to_string())
}

/// Constructs the **primary chat** config for Groq.
///
/// # Env
/// - `GROQ_API_KEY` (required)
/// - `GROQ_URL`, `LLM_MODEL`, `LLM_MAX_TOKENS`, `LLM_TEMPERATURE`,
///   `LLM_TOP_P`, `LLM_TIMEOUT_SECS` (optional)
pub fn config_groq_chat() -> Result<LlmModelConfig, AiLlmError> {
    let api_key = must_env("GROQ_API_KEY")?;

    Ok(LlmModelConfig {
        provider: LlmProvider::Groq,
        model: env_or("LLM_MODEL", DEFAULT_CHAT_MODEL),
        endpoint: env_or("GROQ_URL", DEFAULT_GROQ_URL),
        api_key: Some(api_key),
        max_tokens: Some(env_opt_u32("LLM_MAX_TOKENS")?.unwrap_or(DEFAULT_MAX_TOKENS)),
        temperature: Some(env_opt_f32("LLM_TEMPERATURE")?.unwrap_or(DEFAULT_TEMPERATURE)),
        top_p: Some(env_opt_f32("LLM_TOP_P")?.unwrap_or(DEFAULT_TOP_P)),
        timeout_secs: Some(env_opt_u64("LLM_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS)),
    })
}

/// Constructs the full completion config (chat + fallbacks + retry budget)
/// and validates it.
///
/// # Env
/// - everything read by [`config_groq_chat`]
/// - `LLM_FALLBACK_MODELS` (optional; empty value disables fallbacks)
/// - `LLM_MAX_RETRIES` (optional)
pub fn config_completion() -> Result<CompletionConfig, AiLlmError> {
    let chat = config_groq_chat()?;
    let fallback_models = env_list("LLM_FALLBACK_MODELS").unwrap_or_else(|| {
        DEFAULT_FALLBACK_MODELS
            .iter()
            .map(|m| m.to_string())
            .collect()
    });
    let max_retries = env_opt_u32("LLM_MAX_RETRIES")?.unwrap_or(DEFAULT_MAX_RETRIES);

    let cfg = CompletionConfig {
        chat,
        fallback_models,
        max_retries,
    };
    cfg.validate()?;
    Ok(cfg)
}

/// Constructs a config for the **embedding** Ollama model.
///
/// # Env
/// - `EMBEDDING_MODEL` (optional, default [`DEFAULT_EMBEDDING_MODEL`])
///
/// # Defaults
/// - `temperature = Some(0.0)` (deterministic)
/// - `timeout_secs = Some(30)`
pub fn config_ollama_embedding() -> Result<LlmModelConfig, AiLlmError> {
    let endpoint = ollama_endpoint()?;

    Ok(LlmModelConfig {
        provider: LlmProvider::Ollama,
        model: env_or("EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL),
        endpoint,
        api_key: None,
        max_tokens: None,
        temperature: Some(0.0),
        top_p: None,
        timeout_secs: Some(30),
    })
}

/// Whether query embeddings are L2-normalized (`EMBEDDING_NORMALIZE`, default `true`).
pub fn embedding_normalize() -> Result<bool, AiLlmError> {
    env_bool("EMBEDDING_NORMALIZE", true)
}
