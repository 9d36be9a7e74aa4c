use std::{process::ExitCode, sync::Arc};

use ai_llm_service::{
    CompletionClient, LlmModelConfig,
    config::default_config::{config_completion, config_ollama_embedding},
    error_handler::env_bool,
    health_service::HealthService,
};
use anyhow::Context;
use api::{AppState, ServerConfig};
use contextor::{ContextorConfig, PipelineStatus, RagPipeline, SYSTEM_PROMPT};
use hp_rag::bootstrap::{self, ConfigErrors, banner, fail, ok, step, warn};
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = bootstrap::init() {
        eprintln!("{e:#}");
        return ExitCode::FAILURE;
    }
    banner();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{e:#}"), "startup failed");
            fail(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    step("Validating environment");
    let mut errors = ConfigErrors::default();
    let completion_cfg = errors.take("completion configuration", config_completion());
    let embed_cfg = errors.take("embedding configuration", config_ollama_embedding());
    let server_cfg = errors.take("server configuration", ServerConfig::from_env());
    let contextor_cfg = errors.take("pipeline configuration", ContextorConfig::from_env());
    let startup_check = errors.take("LLM_STARTUP_PROBE", env_bool("LLM_STARTUP_PROBE", true));
    errors.into_result()?;
    let (
        Some(completion_cfg),
        Some(embed_cfg),
        Some(server_cfg),
        Some(contextor_cfg),
        Some(startup_check),
    ) = (completion_cfg, embed_cfg, server_cfg, contextor_cfg, startup_check)
    else {
        anyhow::bail!("configuration incomplete");
    };
    ok(&format!(
        "models: {}",
        completion_cfg.models().join(" → ")
    ));

    let probes: Vec<LlmModelConfig> = vec![completion_cfg.chat.clone(), embed_cfg];
    let client = CompletionClient::new(completion_cfg)
        .context("completion client")?
        .with_system_prompt(SYSTEM_PROMPT);

    if startup_check {
        step("Testing completion API");
        let report = client.test_connection().await;
        if report.ok {
            ok(&report.message);
        } else {
            warn(&report.message);
        }
    }

    step("Connecting to the book index");
    let store = bootstrap::connect_store()?;
    let pipeline = Arc::new(RagPipeline::new(Arc::new(client), &contextor_cfg));
    let init = pipeline
        .initialize(Arc::new(store))
        .await
        .context("pipeline initialization")?;
    ok(&format!(
        "{} passages indexed; warm-up \"{}\" returned {}",
        init.document_count, init.warmup_query, init.warmup_hits
    ));

    let stats = pipeline.system_stats().await;
    match stats.status {
        PipelineStatus::Ready => ok(&format!(
            "collection {} · embeddings {} · k={}",
            stats.collection.as_deref().unwrap_or("-"),
            stats.embedding_model.as_deref().unwrap_or("-"),
            stats.retrieval_k
        )),
        _ => warn(&format!(
            "retrieval check: {}",
            stats.error.as_deref().unwrap_or("no documents for test query")
        )),
    }

    let health = HealthService::new(Some(5)).context("health client")?;
    step(&format!("Serving on http://{}", server_cfg.addr));
    api::start(AppState::new(pipeline, health, probes), server_cfg.addr)
        .await
        .context("server")?;
    Ok(())
}
