//! Settings for the fallback-aware completion client.

use crate::{
    config::{
        default_config::{
            DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SECS, DEFAULT_TOP_P,
        },
        llm_model_config::LlmModelConfig,
    },
    error_handler::{ConfigError, Result, validate_http_endpoint, validate_range_f32},
};

/// Primary chat model config plus the ordered fallback list and retry budget.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    /// Primary model and the default generation parameters.
    pub chat: LlmModelConfig,
    /// Models tried after the primary, in this order.
    pub fallback_models: Vec<String>,
    /// Attempts per model before moving on.
    pub max_retries: u32,
}

impl CompletionConfig {
    /// `[primary] ++ fallbacks`, primary always first.
    pub fn models(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(1 + self.fallback_models.len());
        out.push(self.chat.model.clone());
        out.extend(self.fallback_models.iter().cloned());
        out
    }

    pub fn max_tokens(&self) -> u32 {
        self.chat.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)
    }

    pub fn temperature(&self) -> f32 {
        self.chat.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }

    pub fn top_p(&self) -> f32 {
        self.chat.top_p.unwrap_or(DEFAULT_TOP_P)
    }

    pub fn timeout_secs(&self) -> u64 {
        self.chat.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    /// Checks model names, sampling ranges, endpoint scheme and retry budget.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<()> {
        if self.chat.model.trim().is_empty()
            || self.fallback_models.iter().any(|m| m.trim().is_empty())
        {
            return Err(ConfigError::EmptyModel.into());
        }
        validate_http_endpoint("GROQ_URL", self.chat.endpoint.trim())?;
        validate_range_f32(
            "temperature",
            self.temperature(),
            0.0,
            2.0,
            "expected 0.0..=2.0",
        )?;
        validate_range_f32("top_p", self.top_p(), 0.0, 1.0, "expected 0.0..=1.0")?;
        if self.max_retries == 0 {
            return Err(ConfigError::OutOfRange {
                field: "max_retries",
                detail: "expected at least 1",
            }
            .into());
        }
        if self.timeout_secs() == 0 {
            return Err(ConfigError::OutOfRange {
                field: "timeout_secs",
                detail: "expected at least 1",
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LlmProvider;

    fn sample() -> CompletionConfig {
        CompletionConfig {
            chat: LlmModelConfig {
                provider: LlmProvider::Groq,
                model: "primary".into(),
                endpoint: "https://api.groq.com/openai".into(),
                api_key: Some("key".into()),
                max_tokens: None,
                temperature: None,
                top_p: None,
                timeout_secs: None,
            },
            fallback_models: vec!["a".into(), "b".into()],
            max_retries: 3,
        }
    }

    #[test]
    fn primary_is_always_first() {
        assert_eq!(sample().models(), vec!["primary", "a", "b"]);
    }

    #[test]
    fn unset_parameters_use_defaults() {
        let cfg = sample();
        assert_eq!(cfg.max_tokens(), 1500);
        assert_eq!(cfg.temperature(), 0.7);
        assert_eq!(cfg.top_p(), 0.9);
        assert_eq!(cfg.timeout_secs(), 45);
    }

    #[test]
    fn validation_rejects_bad_values() {
        assert!(sample().validate().is_ok());

        let mut cfg = sample();
        cfg.max_retries = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = sample();
        cfg.chat.temperature = Some(3.0);
        assert!(cfg.validate().is_err());

        let mut cfg = sample();
        cfg.fallback_models.push("  ".into());
        assert!(cfg.validate().is_err());

        let mut cfg = sample();
        cfg.chat.endpoint = "ftp://nope".into();
        assert!(cfg.validate().is_err());
    }
}
