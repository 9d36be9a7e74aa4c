//! OpenAI-compatible chat completion transport (Groq).
//!
//! Minimal, non-streaming client around `POST {endpoint}/v1/chat/completions`.
//! One call of [`ChatTransport::send`] is exactly one HTTP attempt; retries and
//! model fallback live in [`crate::completion::CompletionClient`].
//!
//! Constructor validation:
//! - `cfg.provider` must be `LlmProvider::Groq`
//! - `cfg.api_key` must be present
//! - `cfg.endpoint` must start with http:// or https://
//!
//! Failures are normalized so the caller can tell rate limiting (HTTP 429)
//! apart from every other kind of failure.

use std::{
    future::Future,
    pin::Pin,
    time::{Duration, Instant},
};

use reqwest::{StatusCode, header};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::{
    completion::{ChatRequest, ChatTransport},
    config::{
        default_config::DEFAULT_TIMEOUT_SECS, llm_model_config::LlmModelConfig,
        llm_provider::LlmProvider,
    },
    error_handler::{AiLlmError, HttpError, ProviderError, ProviderErrorKind, make_snippet},
};

/// Thin client for an OpenAI-compatible chat API.
///
/// Keeps a preconfigured `reqwest::Client` (timeout + bearer header) that is
/// reused for every attempt and every model.
#[derive(Debug)]
pub struct OpenAiService {
    client: reqwest::Client,
    url_chat: String,
    timeout: Duration,
}

impl OpenAiService {
    /// Creates a new [`OpenAiService`] from the given config.
    ///
    /// # Errors
    /// - [`AiLlmError::Provider`] with `InvalidProvider` if `cfg.provider` is not Groq
    /// - [`AiLlmError::Provider`] with `MissingApiKey` if `cfg.api_key` is `None`
    /// - [`AiLlmError::Provider`] with `InvalidEndpoint` if `cfg.endpoint` is invalid
    /// - [`AiLlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: &LlmModelConfig) -> Result<Self, AiLlmError> {
        if cfg.provider != LlmProvider::Groq {
            return Err(
                ProviderError::new(cfg.provider, ProviderErrorKind::InvalidProvider).into(),
            );
        }

        let api_key = cfg
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ProviderError::new(cfg.provider, ProviderErrorKind::MissingApiKey))?;

        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(ProviderError::new(
                cfg.provider,
                ProviderErrorKind::InvalidEndpoint(cfg.endpoint.clone()),
            )
            .into());
        }

        let timeout = Duration::from_secs(cfg.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", api_key.trim())).map_err(
                |e| {
                    ProviderError::new(
                        cfg.provider,
                        ProviderErrorKind::Decode(format!("invalid API key header: {e}")),
                    )
                },
            )?,
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let url_chat = format!("{}/v1/chat/completions", endpoint.trim_end_matches('/'));

        info!(
            provider = ?cfg.provider,
            endpoint = %cfg.endpoint,
            timeout_secs = timeout.as_secs(),
            "OpenAiService initialized"
        );

        Ok(Self {
            client,
            url_chat,
            timeout,
        })
    }

    /// Performs one **non-streaming** chat completion request.
    ///
    /// # Errors
    /// - [`ProviderErrorKind::RateLimited`] for HTTP 429
    /// - [`ProviderErrorKind::HttpStatus`] for any other status than 200
    /// - [`AiLlmError::Timeout`] when the per-call timeout elapses
    /// - [`AiLlmError::HttpTransport`] for other client/network failures
    /// - [`ProviderErrorKind::Decode`] if the JSON cannot be parsed
    /// - [`ProviderErrorKind::EmptyChoices`] if `choices[0]` is missing or has no content
    pub async fn generate(&self, request: &ChatRequest) -> Result<String, AiLlmError> {
        let started = Instant::now();

        debug!(
            model = %request.model,
            messages = request.messages.len(),
            max_tokens = request.max_tokens,
            "POST {}", self.url_chat
        );

        let resp = self
            .client
            .post(&self.url_chat)
            .json(request)
            .send()
            .await
            .map_err(|e| AiLlmError::from_transport(e, self.timeout))?;

        let status = resp.status();
        if status != StatusCode::OK {
            let url = self.url_chat.clone();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            warn!(
                %status,
                %url,
                %snippet,
                model = %request.model,
                latency_ms = started.elapsed().as_millis(),
                "chat completion returned a status other than 200"
            );

            let http = HttpError {
                status,
                url,
                snippet,
            };
            let kind = if status == StatusCode::TOO_MANY_REQUESTS {
                ProviderErrorKind::RateLimited(http)
            } else {
                ProviderErrorKind::HttpStatus(http)
            };
            return Err(ProviderError::new(LlmProvider::Groq, kind).into());
        }

        let out: ChatCompletionResponse = match resp.json().await {
            Ok(v) => v,
            Err(e) if e.is_timeout() => return Err(AiLlmError::Timeout(self.timeout)),
            Err(e) => {
                warn!(
                    error = %e,
                    model = %request.model,
                    latency_ms = started.elapsed().as_millis(),
                    "failed to decode chat completion response"
                );
                return Err(ProviderError::new(
                    LlmProvider::Groq,
                    ProviderErrorKind::Decode(format!(
                        "serde error: {e}; expected `choices[0].message.content`"
                    )),
                )
                .into());
            }
        };

        let content = out
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ProviderError::new(LlmProvider::Groq, ProviderErrorKind::EmptyChoices))?;

        info!(
            model = %request.model,
            latency_ms = started.elapsed().as_millis(),
            chars = content.len(),
            "chat completion completed"
        );

        Ok(content)
    }
}

impl ChatTransport for OpenAiService {
    fn send<'a>(
        &'a self,
        request: &'a ChatRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String, AiLlmError>> + Send + 'a>> {
        Box::pin(self.generate(request))
    }
}

/* ===========================================================================
HTTP payloads
======================================================================== */

/// Minimal response for `/v1/chat/completions`.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageOut,
}

#[derive(Debug, Deserialize)]
struct ChatMessageOut {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::ChatMessage;
    use axum::{
        Json, Router,
        http::HeaderMap,
        response::{IntoResponse, Response},
        routing::post,
    };
    use serde_json::{Value, json};

    async fn fake_chat(headers: HeaderMap, Json(body): Json<Value>) -> Response {
        if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some("Bearer test-key") {
            return (axum::http::StatusCode::UNAUTHORIZED, "bad key").into_response();
        }
        match body["model"].as_str().unwrap_or_default() {
            "ok" => Json(json!({
                "choices": [{ "message": { "role": "assistant", "content": format!(
                    "echo:{}:{}",
                    body["messages"][0]["role"].as_str().unwrap_or_default(),
                    body["max_tokens"]
                ) } }]
            }))
            .into_response(),
            "limited" => (axum::http::StatusCode::TOO_MANY_REQUESTS, "slow down").into_response(),
            "empty" => Json(json!({ "choices": [] })).into_response(),
            "late" => Json(json!({
                "choices": [
                    { "message": { "role": "assistant", "content": null } },
                    { "message": { "role": "assistant", "content": "second" } }
                ]
            }))
            .into_response(),
            "created" => (
                axum::http::StatusCode::CREATED,
                Json(json!({ "choices": [{ "message": { "content": "queued" } }] })),
            )
                .into_response(),
            "garbage" => (
                [(axum::http::header::CONTENT_TYPE, "application/json")],
                "definitely not json",
            )
                .into_response(),
            "slow" => {
                tokio::time::sleep(Duration::from_secs(3)).await;
                Json(json!({ "choices": [] })).into_response()
            }
            _ => (axum::http::StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        }
    }

    async fn spawn_server() -> String {
        let app = Router::new().route("/v1/chat/completions", post(fake_chat));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn cfg(endpoint: String) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Groq,
            model: "ok".into(),
            endpoint,
            api_key: Some("test-key".into()),
            max_tokens: Some(1500),
            temperature: Some(0.7),
            top_p: Some(0.9),
            timeout_secs: Some(1),
        }
    }

    fn request(model: &str) -> ChatRequest {
        ChatRequest {
            model: model.into(),
            messages: vec![
                ChatMessage::system("be helpful"),
                ChatMessage::user("hello"),
            ],
            max_tokens: 42,
            temperature: 0.7,
            top_p: 0.9,
        }
    }

    #[tokio::test]
    async fn returns_first_choice_content() {
        let svc = OpenAiService::new(&cfg(spawn_server().await)).unwrap();
        let text = svc.generate(&request("ok")).await.unwrap();
        assert_eq!(text, "echo:system:42");
    }

    #[tokio::test]
    async fn maps_status_codes() {
        let svc = OpenAiService::new(&cfg(spawn_server().await)).unwrap();

        let limited = svc.generate(&request("limited")).await.unwrap_err();
        assert!(limited.is_rate_limited());

        let created = svc.generate(&request("created")).await.unwrap_err();
        assert!(matches!(
            created,
            AiLlmError::Provider(ProviderError {
                kind: ProviderErrorKind::HttpStatus(HttpError { status, .. }),
                ..
            }) if status == StatusCode::CREATED
        ));

        let failed = svc.generate(&request("other")).await.unwrap_err();
        assert!(matches!(
            failed,
            AiLlmError::Provider(ProviderError {
                kind: ProviderErrorKind::HttpStatus(HttpError { status, .. }),
                ..
            }) if status == StatusCode::INTERNAL_SERVER_ERROR
        ));
    }

    #[tokio::test]
    async fn maps_bad_payloads() {
        let svc = OpenAiService::new(&cfg(spawn_server().await)).unwrap();

        let empty = svc.generate(&request("empty")).await.unwrap_err();
        assert!(matches!(
            empty,
            AiLlmError::Provider(ProviderError {
                kind: ProviderErrorKind::EmptyChoices,
                ..
            })
        ));

        let late = svc.generate(&request("late")).await.unwrap_err();
        assert!(matches!(
            late,
            AiLlmError::Provider(ProviderError {
                kind: ProviderErrorKind::EmptyChoices,
                ..
            })
        ));

        let garbage = svc.generate(&request("garbage")).await.unwrap_err();
        assert!(matches!(
            garbage,
            AiLlmError::Provider(ProviderError {
                kind: ProviderErrorKind::Decode(_),
                ..
            })
        ));
    }

    #[tokio::test]
    async fn slow_upstream_times_out() {
        let svc = OpenAiService::new(&cfg(spawn_server().await)).unwrap();
        let err = svc.generate(&request("slow")).await.unwrap_err();
        assert!(matches!(err, AiLlmError::Timeout(d) if d == Duration::from_secs(1)));
    }

    #[test]
    fn rejects_incomplete_config() {
        let mut no_key = cfg("https://api.groq.com/openai".into());
        no_key.api_key = None;
        assert!(OpenAiService::new(&no_key).is_err());

        let mut wrong_provider = cfg("https://api.groq.com/openai".into());
        wrong_provider.provider = LlmProvider::Ollama;
        assert!(OpenAiService::new(&wrong_provider).is_err());

        assert!(OpenAiService::new(&cfg("api.groq.com".into())).is_err());
    }
}
