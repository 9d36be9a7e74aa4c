//! Lightweight Ollama client for query embeddings.
//!
//! - `POST {endpoint}/api/embed`      (current embedding API)
//! - `POST {endpoint}/api/embeddings` (legacy API, used when `/api/embed` is 404)
//!
//! Vectors can be L2-normalized before they are returned, matching how the
//! index was built (`normalize_embeddings=True`).
//!
//! # Examples
//!
//! ```no_run
//! use ai_llm_service::config::default_config::config_ollama_embedding;
//! use ai_llm_service::services::ollama_service::OllamaService;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let svc = OllamaService::new(config_ollama_embedding()?, true)?;
//! let vec = svc.embeddings("Who is Severus Snape?").await?;
//! println!("Embeddings dimension = {}", vec.len());
//! # Ok(()) }
//! ```

use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
use crate::error_handler::make_snippet;

/// Errors produced by [`OllamaService`].
#[derive(Debug, Error)]
pub enum OllamaError {
    /// The provider in the config is not Ollama.
    #[error("[AI LLM Service] invalid provider: expected Ollama, got different provider")]
    InvalidProvider,

    /// Invalid endpoint (empty or missing http/https).
    #[error("[AI LLM Service] invalid Ollama endpoint: {0}")]
    InvalidEndpoint(String),

    /// Transport/HTTP client error.
    #[error("[AI LLM Service] transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-successful HTTP status from upstream.
    #[error("[AI LLM Service] unexpected HTTP status {status} from {url}: {snippet}")]
    HttpStatus {
        status: StatusCode,
        url: String,
        snippet: String,
    },

    /// Unexpected/invalid JSON response.
    #[error("[AI LLM Service] failed to decode response: {0}")]
    Decode(String),
}

/// Result alias for Ollama operations.
pub type Result<T> = std::result::Result<T, OllamaError>;

/// Thin embedding client for Ollama.
pub struct OllamaService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    normalize: bool,
    url_embed: String,
    url_embeddings_legacy: String,
}

impl OllamaService {
    /// Creates a new [`OllamaService`] from the given config.
    ///
    /// # Errors
    /// - [`OllamaError::InvalidProvider`] if `cfg.provider` is not `Ollama`
    /// - [`OllamaError::InvalidEndpoint`] if `cfg.endpoint` is invalid
    /// - [`OllamaError::Transport`] if HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig, normalize: bool) -> Result<Self> {
        if cfg.provider != LlmProvider::Ollama {
            return Err(OllamaError::InvalidProvider);
        }

        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(OllamaError::InvalidEndpoint(cfg.endpoint));
        }

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(30));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .brotli(true)
            .build()?;

        let base = endpoint.trim_end_matches('/').to_string();
        let url_embed = format!("{base}/api/embed");
        let url_embeddings_legacy = format!("{base}/api/embeddings");

        Ok(Self {
            client,
            cfg,
            normalize,
            url_embed,
            url_embeddings_legacy,
        })
    }

    pub fn model(&self) -> &str {
        &self.cfg.model
    }

    pub fn config(&self) -> &LlmModelConfig {
        &self.cfg
    }

    /// Embeds one text.
    ///
    /// # Errors
    /// - [`OllamaError::HttpStatus`] for non-2xx responses
    /// - [`OllamaError::Transport`] for client errors
    /// - [`OllamaError::Decode`] if the response has no vector
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn embeddings(&self, input: &str) -> Result<Vec<f32>> {
        let mut vector = match self.embed_current(input).await {
            Err(OllamaError::HttpStatus { status, .. }) if status == StatusCode::NOT_FOUND => {
                debug!("/api/embed not available, using legacy /api/embeddings");
                self.embed_legacy(input).await?
            }
            other => other?,
        };

        if vector.is_empty() {
            return Err(OllamaError::Decode("empty embedding vector".into()));
        }
        if self.normalize {
            l2_normalize(&mut vector);
        }
        Ok(vector)
    }

    async fn embed_current(&self, input: &str) -> Result<Vec<f32>> {
        let body = EmbedRequest {
            model: &self.cfg.model,
            input,
        };
        debug!("POST {}", self.url_embed);
        let resp = self.client.post(&self.url_embed).json(&body).send().await?;
        let resp = check_status(resp, &self.url_embed).await?;

        let out: EmbedResponse = resp.json().await.map_err(|e| {
            OllamaError::Decode(format!("serde error: {e}; expected `{{ embeddings: number[][] }}`"))
        })?;
        out.embeddings
            .into_iter()
            .next()
            .ok_or_else(|| OllamaError::Decode("`embeddings` array is empty".into()))
    }

    async fn embed_legacy(&self, input: &str) -> Result<Vec<f32>> {
        let body = LegacyEmbeddingsRequest {
            model: &self.cfg.model,
            prompt: input,
        };
        debug!("POST {}", self.url_embeddings_legacy);
        let resp = self
            .client
            .post(&self.url_embeddings_legacy)
            .json(&body)
            .send()
            .await?;
        let resp = check_status(resp, &self.url_embeddings_legacy).await?;

        let out: LegacyEmbeddingsResponse = resp.json().await.map_err(|e| {
            OllamaError::Decode(format!("serde error: {e}; expected `{{ embedding: number[] }}`"))
        })?;
        Ok(out.embedding)
    }
}

async fn check_status(resp: reqwest::Response, url: &str) -> Result<reqwest::Response> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    Err(OllamaError::HttpStatus {
        status,
        url: url.to_string(),
        snippet: make_snippet(&text),
    })
}

/// Scales `v` to unit length in place; zero vectors are left untouched.
pub fn l2_normalize(v: &mut [f32]) {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        v.iter_mut().for_each(|x| *x /= norm);
    }
}

/* ==========================
HTTP payloads
========================== */

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[derive(Debug, Serialize)]
struct LegacyEmbeddingsRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct LegacyEmbeddingsResponse {
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, routing::post};
    use serde_json::{Value, json};

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn cfg(endpoint: String) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: "all-minilm".into(),
            endpoint,
            api_key: None,
            max_tokens: None,
            temperature: Some(0.0),
            top_p: None,
            timeout_secs: Some(5),
        }
    }

    #[test]
    fn normalizes_to_unit_length() {
        let mut v = vec![3.0, 4.0];
        l2_normalize(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);

        let mut zero = vec![0.0, 0.0];
        l2_normalize(&mut zero);
        assert_eq!(zero, vec![0.0, 0.0]);
    }

    #[tokio::test]
    async fn uses_current_embed_api() {
        let app = Router::new().route(
            "/api/embed",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["input"], "wand");
                Json(json!({ "embeddings": [[3.0, 4.0]] }))
            }),
        );
        let svc = OllamaService::new(cfg(spawn(app).await), true).unwrap();

        let v = svc.embeddings("wand").await.unwrap();
        assert!((v[0] - 0.6).abs() < 1e-6);
    }

    #[tokio::test]
    async fn falls_back_to_legacy_api() {
        let app = Router::new().route(
            "/api/embeddings",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["prompt"], "owl");
                Json(json!({ "embedding": [1.0, 2.0, 2.0] }))
            }),
        );
        let svc = OllamaService::new(cfg(spawn(app).await), false).unwrap();

        assert_eq!(svc.embeddings("owl").await.unwrap(), vec![1.0, 2.0, 2.0]);
    }

    #[test]
    fn rejects_wrong_provider() {
        let mut c = cfg("http://localhost:11434".into());
        c.provider = LlmProvider::Groq;
        assert!(matches!(
            OllamaService::new(c, true),
            Err(OllamaError::InvalidProvider)
        ));
    }
}
