use std::{path::PathBuf, sync::Arc};

use ai_llm_service::{
    config::default_config::{config_ollama_embedding, embedding_normalize},
    services::ollama_service::OllamaService,
    telemetry,
};
use anyhow::Context;
use colored::Colorize;
use rag_store::{RagConfig, RagStore, embed::ollama::OllamaEmbedder};
use tracing::{Level, debug, info};
use tracing_subscriber::{Layer, filter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Loads `.env`, then installs tracing and records which file was read.
pub fn init() -> anyhow::Result<()> {
    let env_file = load_dotenv()?;
    init_tracing()?;
    match env_file {
        Some(path) => info!(path = %path.display(), "loaded environment file"),
        None => debug!("no .env file; using the process environment"),
    }
    Ok(())
}

/// Loads `.env` when present. A missing file is fine; a malformed one is not.
pub fn load_dotenv() -> anyhow::Result<Option<PathBuf>> {
    env_file_outcome(dotenvy::dotenv())
}

fn env_file_outcome(
    loaded: Result<PathBuf, dotenvy::Error>,
) -> anyhow::Result<Option<PathBuf>> {
    match loaded {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e).context("failed to read .env"),
    }
}

/// Collects configuration failures so startup can list all of them at once.
#[derive(Debug, Default)]
pub struct ConfigErrors(Vec<String>);

impl ConfigErrors {
    /// Keeps the value, or records the error under `what`.
    pub fn take<T, E: std::fmt::Display>(&mut self, what: &str, res: Result<T, E>) -> Option<T> {
        match res {
            Ok(v) => Some(v),
            Err(e) => {
                self.0.push(format!("{what}: {e}"));
                None
            }
        }
    }

    pub fn messages(&self) -> &[String] {
        &self.0
    }

    /// # Errors
    /// One error whose message lists every recorded failure.
    pub fn into_result(self) -> anyhow::Result<()> {
        if self.0.is_empty() {
            return Ok(());
        }
        let list: String = self.0.iter().map(|m| format!("\n  - {m}")).collect();
        Err(anyhow::anyhow!(
            "{} configuration error(s):{list}",
            self.0.len()
        ))
    }
}

/// Installs the global subscriber: `RUST_LOG` (default `info`) for the app,
/// plus the library-scoped layer of `ai-llm-service`.
pub fn init_tracing() -> anyhow::Result<()> {
    let app_only = filter::filter_fn(|meta| !telemetry::is_library_target(meta.target()));

    tracing_subscriber::registry()
        .with(telemetry::env_filter_with_level("info", Level::INFO))
        .with(fmt::layer().with_target(false).with_filter(app_only))
        .with(telemetry::layer())
        .try_init()
        .context("failed to install tracing subscriber")
}

/// Connects to the vector store with an Ollama query embedder.
pub fn connect_store() -> anyhow::Result<RagStore> {
    let embed_cfg = config_ollama_embedding().context("embedding configuration")?;
    let normalize = embedding_normalize().context("embedding configuration")?;
    let ollama = OllamaService::new(embed_cfg, normalize).context("embedding client")?;

    let rag_cfg = RagConfig::from_env().context("vector store configuration")?;
    let embedder = OllamaEmbedder::new(Arc::new(ollama), rag_cfg.embedding_dim);

    RagStore::new(rag_cfg, Arc::new(embedder)).context("vector store client")
}

pub fn banner() {
    let line = "═".repeat(60);
    println!("{}", line.yellow());
    println!("{}", "⚡ MAGICAL HARRY POTTER RAG ASSISTANT 🏰".yellow().bold());
    println!("{}", "\"Wit beyond measure is man's greatest treasure\"".italic());
    println!("{}", line.yellow());
}

pub fn step(label: &str) {
    println!("{} {label}", "▶".cyan().bold());
}

pub fn ok(label: &str) {
    println!("  {} {label}", "✓".green().bold());
}

pub fn warn(label: &str) {
    println!("  {} {label}", "!".yellow().bold());
}

pub fn fail(label: &str) {
    eprintln!("  {} {label}", "✗".red().bold());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_file_is_optional_but_must_parse() {
        let found = env_file_outcome(Ok(PathBuf::from("/srv/hp/.env"))).unwrap();
        assert_eq!(found, Some(PathBuf::from("/srv/hp/.env")));

        let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "no .env");
        assert_eq!(env_file_outcome(Err(dotenvy::Error::Io(missing))).unwrap(), None);

        let broken = dotenvy::Error::LineParse("GROQ_API_KEY".into(), 12);
        let err = env_file_outcome(Err(broken)).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read .env"));
    }

    #[test]
    fn config_errors_are_listed_together() {
        let mut errors = ConfigErrors::default();
        let key: Option<u32> = errors.take("GROQ_API_KEY", Err("missing"));
        let port = errors.take("API_PORT", "8080".parse::<u16>());
        let k = errors.take("RETRIEVAL_K", "abc".parse::<usize>());

        assert_eq!(key, None);
        assert_eq!(port, Some(8080));
        assert_eq!(k, None);
        assert_eq!(errors.messages().len(), 2);

        let msg = errors.into_result().unwrap_err().to_string();
        assert!(msg.starts_with("2 configuration error(s):"));
        assert!(msg.contains("\n  - GROQ_API_KEY: missing"));
        assert!(msg.contains("\n  - RETRIEVAL_K: invalid digit"));
    }

    #[test]
    fn no_errors_means_ok() {
        let mut errors = ConfigErrors::default();
        assert_eq!(errors.take("API_HOST", Ok::<_, String>("0.0.0.0")), Some("0.0.0.0"));
        assert!(errors.into_result().is_ok());
    }
}
