//! Connection and collection configuration.

use crate::errors::RagError;

pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";
/// Collection name LangChain uses when none is given.
pub const DEFAULT_COLLECTION: &str = "langchain";
/// Payload key LangChain stores passage text under.
pub const DEFAULT_CONTENT_KEY: &str = "page_content";
/// Vector size of `all-MiniLM-L6-v2`.
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Configuration for retrieval.
#[derive(Clone, Debug)]
pub struct RagConfig {
    /// Qdrant gRPC endpoint, e.g. `http://localhost:6334`.
    pub qdrant_url: String,
    /// Optional API key for Qdrant Cloud.
    pub qdrant_api_key: Option<String>,
    /// Target collection name.
    pub collection: String,
    /// Payload key holding the passage text (`text` is tried as a fallback).
    pub content_key: String,
    /// Expected embedding dimension; `None` skips the check.
    pub embedding_dim: Option<usize>,
    /// Exact search flag (false = HNSW ANN).
    pub exact_search: bool,
}

impl RagConfig {
    /// Creates a default config for a given collection name and Qdrant endpoint.
    pub fn new_default(url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            qdrant_url: url.into(),
            qdrant_api_key: None,
            collection: collection.into(),
            content_key: DEFAULT_CONTENT_KEY.to_string(),
            embedding_dim: Some(DEFAULT_EMBEDDING_DIM),
            exact_search: false,
        }
    }

    /// Reads `QDRANT_URL`, `QDRANT_API_KEY`, `QDRANT_COLLECTION`,
    /// `QDRANT_CONTENT_KEY`, `EMBEDDING_DIM` and `RAG_EXACT_SEARCH`.
    ///
    /// # Errors
    /// Returns `RagError::Config` for unparsable numbers/flags or failed validation.
    pub fn from_env() -> Result<Self, RagError> {
        let mut cfg = Self::new_default(
            env("QDRANT_URL").unwrap_or_else(|| DEFAULT_QDRANT_URL.to_string()),
            env("QDRANT_COLLECTION").unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
        );
        cfg.qdrant_api_key = env("QDRANT_API_KEY");
        if let Some(key) = env("QDRANT_CONTENT_KEY") {
            cfg.content_key = key;
        }
        if let Some(dim) = env("EMBEDDING_DIM") {
            let dim = dim
                .parse::<usize>()
                .map_err(|_| RagError::Config(format!("EMBEDDING_DIM is not a number: {dim}")))?;
            cfg.embedding_dim = (dim > 0).then_some(dim);
        }
        if let Some(flag) = env("RAG_EXACT_SEARCH") {
            cfg.exact_search = matches!(flag.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), RagError> {
        if self.qdrant_url.trim().is_empty() {
            return Err(RagError::Config("qdrant_url is empty".into()));
        }
        if !(self.qdrant_url.starts_with("http://") || self.qdrant_url.starts_with("https://")) {
            return Err(RagError::Config(
                "qdrant_url must start with http:// or https://".into(),
            ));
        }
        if self.collection.trim().is_empty() {
            return Err(RagError::Config("collection is empty".into()));
        }
        if self.content_key.trim().is_empty() {
            return Err(RagError::Config("content_key is empty".into()));
        }
        Ok(())
    }
}

fn env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_langchain_layout() {
        let cfg = RagConfig::new_default(DEFAULT_QDRANT_URL, DEFAULT_COLLECTION);
        assert_eq!(cfg.collection, "langchain");
        assert_eq!(cfg.content_key, "page_content");
        assert_eq!(cfg.embedding_dim, Some(384));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validation_catches_blank_fields() {
        assert!(RagConfig::new_default("", "c").validate().is_err());
        assert!(RagConfig::new_default("localhost:6334", "c").validate().is_err());
        assert!(RagConfig::new_default("http://q", " ").validate().is_err());

        let mut cfg = RagConfig::new_default("http://q", "c");
        cfg.content_key = String::new();
        assert!(cfg.validate().is_err());
    }
}
