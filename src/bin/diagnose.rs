//! Inspects the book index and, optionally, the completion API.
//!
//! ```text
//! hp-rag-diagnose --query "Who is Dobby?" --top-k 3 --llm
//! ```

use std::process::ExitCode;

use ai_llm_service::{
    config::default_config::{config_completion, config_ollama_embedding},
    health_service::HealthService,
};
use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use hp_rag::bootstrap::{self, fail, ok, step, warn};

const SAMPLE_QUERIES: [&str; 3] = [
    "Who is Harry Potter?",
    "What is Hogwarts?",
    "Tell me about Hermione",
];

#[derive(Parser, Debug)]
#[command(name = "hp-rag-diagnose", about = "Inspect the Harry Potter book index")]
struct Args {
    /// Query to run; repeatable. Defaults to a few sample questions.
    #[arg(short, long = "query")]
    queries: Vec<String>,

    /// Passages to fetch per query.
    #[arg(short = 'k', long, default_value_t = 3)]
    top_k: usize,

    /// Characters of each passage to print.
    #[arg(long, default_value_t = 200)]
    preview_chars: usize,

    /// Also probe the completion API and the embedding server.
    #[arg(long)]
    llm: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = bootstrap::init() {
        eprintln!("{e:#}");
        return ExitCode::FAILURE;
    }

    match run(args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            fail(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

/// `Ok(false)` when a check failed but the run itself completed.
async fn run(args: Args) -> anyhow::Result<bool> {
    let mut healthy = true;

    step("Vector store");
    let store = bootstrap::connect_store()?;
    match store.count().await {
        Ok(n) if n > 0 => ok(&format!("collection '{}' holds {n} passages", store.collection())),
        Ok(_) => {
            warn(&format!("collection '{}' is empty", store.collection()));
            healthy = false;
        }
        Err(e) => {
            fail(&e.to_string());
            return Ok(false);
        }
    }

    let queries: Vec<String> = if args.queries.is_empty() {
        SAMPLE_QUERIES.iter().map(|q| q.to_string()).collect()
    } else {
        args.queries
    };

    for query in &queries {
        step(&format!("Retrieval: {}", query.bold()));
        let hits = store
            .search_text(query, args.top_k)
            .await
            .with_context(|| format!("search for {query:?}"))?;
        if hits.is_empty() {
            warn("no passages");
            healthy = false;
        }
        for (i, hit) in hits.iter().enumerate() {
            println!(
                "  {}. {} {}",
                i + 1,
                format!("[{:.3}]", hit.score).cyan(),
                hit.source.as_deref().unwrap_or("unknown source").dimmed()
            );
            println!("     {}", hit.preview(args.preview_chars));
        }
    }

    if args.llm {
        step("Providers");
        let completion = config_completion().context("completion configuration")?;
        let embedding = config_ollama_embedding().context("embedding configuration")?;
        let health = HealthService::new(Some(10)).context("health client")?;
        for status in health.check_many(&[completion.chat, embedding]).await {
            let label = format!(
                "{} {} ({} ms): {}",
                status.provider,
                status.model.as_deref().unwrap_or(""),
                status.latency_ms,
                status.message
            );
            if status.ok {
                ok(&label);
            } else {
                fail(&label);
                healthy = false;
            }
        }
    }

    Ok(healthy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults_and_repeatable_queries() {
        let args = Args::parse_from(["hp-rag-diagnose"]);
        assert!(args.queries.is_empty());
        assert_eq!(args.top_k, 3);
        assert!(!args.llm);

        let args = Args::parse_from(["hp-rag-diagnose", "-q", "a", "--query", "b", "-k", "7", "--llm"]);
        assert_eq!(args.queries, vec!["a", "b"]);
        assert_eq!(args.top_k, 7);
        assert!(args.llm);
    }
}
