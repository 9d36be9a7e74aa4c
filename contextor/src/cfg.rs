//! Runtime configuration loaded from environment variables.

use crate::error::ContextorError;

/// Default retrieval breadth for warm-up and stats queries.
pub const DEFAULT_RETRIEVAL_K: usize = 5;

/// Config bag for the pipeline.
#[derive(Clone, Debug)]
pub struct ContextorConfig {
    /// Breadth used by warm-up and diagnostics queries (`RETRIEVAL_K`).
    pub retrieval_k: usize,
}

impl Default for ContextorConfig {
    fn default() -> Self {
        Self {
            retrieval_k: DEFAULT_RETRIEVAL_K,
        }
    }
}

impl ContextorConfig {
    /// Reads `RETRIEVAL_K`; unset or blank keeps the default.
    ///
    /// # Errors
    /// `ContextorError::Config` when the value is not a positive integer.
    ///
    /// # Example
    /// ```
    /// # use contextor::ContextorConfig;
    /// if let Ok(cfg) = ContextorConfig::from_env() {
    ///     assert!(cfg.retrieval_k >= 1);
    /// }
    /// ```
    pub fn from_env() -> Result<Self, ContextorError> {
        let raw = std::env::var("RETRIEVAL_K").ok();
        Ok(Self {
            retrieval_k: parse_retrieval_k(raw.as_deref())?,
        })
    }
}

fn parse_retrieval_k(raw: Option<&str>) -> Result<usize, ContextorError> {
    let Some(v) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(DEFAULT_RETRIEVAL_K);
    };
    match v.parse::<usize>() {
        Ok(0) => Err(ContextorError::Config("RETRIEVAL_K must be at least 1".into())),
        Ok(k) => Ok(k),
        Err(_) => Err(ContextorError::Config(format!(
            "RETRIEVAL_K is not a number: {v}"
        ))),
    }
}
