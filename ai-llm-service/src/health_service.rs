//! Reachability checks behind `/api/health` and `hp-rag-diagnose --llm`.
//!
//! Both backends publish a model listing, so a check is one `GET` followed by
//! a lookup of the configured model in that listing:
//!
//! | provider | listing | auth | ids |
//! |---|---|---|---|
//! | Groq | `/v1/models` | bearer key | `data[].id` |
//! | Ollama | `/api/tags` | none | `models[].name` |

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::llm_model_config::LlmModelConfig;
use crate::config::llm_provider::LlmProvider;
use crate::error_handler::{
    AiLlmError, HealthError, HttpError, ProviderError, ProviderErrorKind, make_snippet,
    validate_http_endpoint,
};

/// Serializable result of one check.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub provider: String,
    pub endpoint: String,
    pub model: Option<String>,
    pub ok: bool,
    /// Zero when the check never reached the network.
    pub latency_ms: u128,
    pub message: String,
}

/// Runs model-listing checks over one shared HTTP client.
pub struct HealthService {
    client: reqwest::Client,
}

/// Union of the two listing shapes; each provider fills one of the arrays.
#[derive(Deserialize)]
struct Listing {
    #[serde(default)]
    data: Vec<ListedModel>,
    #[serde(default)]
    models: Vec<ListedModel>,
}

#[derive(Deserialize)]
struct ListedModel {
    id: Option<String>,
    name: Option<String>,
}

impl HealthService {
    /// # Errors
    /// [`AiLlmError::HttpTransport`] if the HTTP client cannot be built.
    pub fn new(timeout_secs: Option<u64>) -> Result<Self, AiLlmError> {
        let timeout = Duration::from_secs(timeout_secs.unwrap_or(10));
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        debug!(timeout_secs = timeout.as_secs(), "health service ready");
        Ok(Self { client })
    }

    /// Checks one backend. Failures are folded into `ok = false`.
    pub async fn check(&self, cfg: &LlmModelConfig) -> HealthStatus {
        let mut status = HealthStatus {
            provider: format!("{:?}", cfg.provider),
            endpoint: cfg.endpoint.clone(),
            model: Some(cfg.model.clone()),
            ok: false,
            latency_ms: 0,
            message: String::new(),
        };

        if let Err(e) = validate_http_endpoint("endpoint", cfg.endpoint.trim()) {
            status.message = e.to_string();
            warn!(provider = %status.provider, endpoint = %cfg.endpoint, "health check skipped: bad endpoint");
            return status;
        }

        let started = Instant::now();
        let listed = self.listed_models(cfg).await;
        status.latency_ms = started.elapsed().as_millis();

        match listed {
            Ok(ids) if ids.iter().any(|id| model_listed(cfg.provider, id, &cfg.model)) => {
                status.ok = true;
                status.message = "model available".into();
            }
            Ok(ids) => {
                status.message = format!(
                    "reachable, but `{}` is not among {} listed models",
                    cfg.model,
                    ids.len()
                );
            }
            Err(e) => status.message = e.to_string(),
        }

        if status.ok {
            info!(provider = %status.provider, model = %cfg.model, latency_ms = status.latency_ms, "health check passed");
        } else {
            warn!(provider = %status.provider, model = %cfg.model, latency_ms = status.latency_ms, message = %status.message, "health check failed");
        }
        status
    }

    /// Checks each config in order.
    pub async fn check_many(&self, configs: &[LlmModelConfig]) -> Vec<HealthStatus> {
        let mut out = Vec::with_capacity(configs.len());
        for cfg in configs {
            out.push(self.check(cfg).await);
        }
        out
    }

    async fn listed_models(&self, cfg: &LlmModelConfig) -> Result<Vec<String>, AiLlmError> {
        let base = cfg.endpoint.trim().trim_end_matches('/');
        let mut req = match cfg.provider {
            LlmProvider::Groq => {
                let key = cfg.api_key.as_deref().ok_or_else(|| {
                    ProviderError::new(cfg.provider, ProviderErrorKind::MissingApiKey)
                })?;
                self.client.get(format!("{base}/v1/models")).bearer_auth(key)
            }
            LlmProvider::Ollama => self.client.get(format!("{base}/api/tags")),
        };
        if let Some(secs) = cfg.timeout_secs {
            req = req.timeout(Duration::from_secs(secs));
        }

        let resp = req.send().await?;
        let status = resp.status();
        let url = resp.url().to_string();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(HealthError::HttpStatus(HttpError {
                status,
                url,
                snippet: make_snippet(&body),
            })
            .into());
        }

        let listing: Listing = serde_json::from_str(&body)
            .map_err(|e| HealthError::Decode(format!("{url}: {e}")))?;
        Ok(listing
            .data
            .into_iter()
            .chain(listing.models)
            .filter_map(|m| m.id.or(m.name))
            .collect())
    }
}

/// Groq ids must match exactly. Ollama lists names with a tag
/// (`all-minilm:latest`), so an untagged model matches any tag.
fn model_listed(provider: LlmProvider, listed: &str, model: &str) -> bool {
    if listed == model {
        return true;
    }
    provider == LlmProvider::Ollama
        && !model.contains(':')
        && listed
            .strip_prefix(model)
            .is_some_and(|tag| tag.starts_with(':'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        http::{HeaderMap, StatusCode, header},
        routing::get,
    };
    use serde_json::json;

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn cfg(provider: LlmProvider, model: &str, endpoint: String) -> LlmModelConfig {
        LlmModelConfig {
            provider,
            model: model.into(),
            endpoint,
            api_key: Some("key".into()),
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: Some(5),
        }
    }

    #[test]
    fn ollama_accepts_any_tag_for_untagged_model() {
        assert!(model_listed(LlmProvider::Ollama, "all-minilm:latest", "all-minilm"));
        assert!(model_listed(LlmProvider::Ollama, "all-minilm:latest", "all-minilm:latest"));
        assert!(!model_listed(LlmProvider::Ollama, "all-minilm-extra:latest", "all-minilm"));
        assert!(!model_listed(LlmProvider::Ollama, "all-minilm:v2", "all-minilm:latest"));
        assert!(!model_listed(LlmProvider::Groq, "llama-3.1-8b-instant:x", "llama-3.1-8b-instant"));
    }

    #[tokio::test]
    async fn ollama_check_finds_tagged_model() {
        let app = Router::new().route(
            "/api/tags",
            get(|| async { Json(json!({ "models": [{ "name": "all-minilm:latest" }] })) }),
        );
        let base = spawn(app).await;
        let svc = HealthService::new(Some(5)).unwrap();

        let ok = svc.check(&cfg(LlmProvider::Ollama, "all-minilm", base.clone())).await;
        assert!(ok.ok, "{}", ok.message);
        assert_eq!(ok.provider, "Ollama");

        let missing = svc.check(&cfg(LlmProvider::Ollama, "nomic", base)).await;
        assert!(!missing.ok);
        assert!(missing.message.contains("`nomic`"), "{}", missing.message);
    }

    #[tokio::test]
    async fn groq_check_sends_bearer_key() {
        let app = Router::new().route(
            "/v1/models",
            get(|headers: HeaderMap| async move {
                match headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
                    Some("Bearer key") => (
                        StatusCode::OK,
                        Json(json!({ "data": [{ "id": "llama-3.1-8b-instant" }] })),
                    ),
                    _ => (StatusCode::UNAUTHORIZED, Json(json!({}))),
                }
            }),
        );
        let svc = HealthService::new(Some(5)).unwrap();
        let base = spawn(app).await;

        let status = svc
            .check(&cfg(LlmProvider::Groq, "llama-3.1-8b-instant", base.clone()))
            .await;
        assert!(status.ok, "{}", status.message);

        let mut keyless = cfg(LlmProvider::Groq, "llama-3.1-8b-instant", base);
        keyless.api_key = None;
        let status = svc.check(&keyless).await;
        assert!(!status.ok);
        assert!(status.message.contains("missing API key"));
    }

    #[tokio::test]
    async fn groq_check_reports_http_failures_without_erroring() {
        let app = Router::new().route(
            "/v1/models",
            get(|| async { (StatusCode::UNAUTHORIZED, "invalid key") }),
        );
        let svc = HealthService::new(Some(5)).unwrap();

        let status = svc
            .check(&cfg(LlmProvider::Groq, "llama-3.1-8b-instant", spawn(app).await))
            .await;

        assert!(!status.ok);
        assert!(status.message.contains("401"));
        assert!(status.message.contains("invalid key"));
    }

    #[tokio::test]
    async fn unreadable_listing_is_a_failure() {
        let app = Router::new().route("/api/tags", get(|| async { "<html>proxy</html>" }));
        let svc = HealthService::new(Some(5)).unwrap();

        let status = svc.check(&cfg(LlmProvider::Ollama, "all-minilm", spawn(app).await)).await;

        assert!(!status.ok);
        assert!(status.message.contains("decode error"), "{}", status.message);
    }

    #[tokio::test]
    async fn invalid_endpoint_is_reported() {
        let svc = HealthService::new(None).unwrap();
        let status = svc.check(&cfg(LlmProvider::Groq, "m", "localhost".into())).await;
        assert!(!status.ok);
        assert_eq!(status.latency_ms, 0);
    }

    #[tokio::test]
    async fn check_many_keeps_order() {
        let svc = HealthService::new(None).unwrap();
        let statuses = svc
            .check_many(&[
                cfg(LlmProvider::Groq, "a", "nope".into()),
                cfg(LlmProvider::Ollama, "b", "nope".into()),
            ])
            .await;
        let models: Vec<_> = statuses.iter().filter_map(|s| s.model.as_deref()).collect();
        assert_eq!(models, ["a", "b"]);
    }
}
