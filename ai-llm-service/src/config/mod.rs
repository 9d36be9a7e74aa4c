pub mod completion_config;
pub mod default_config;
pub mod llm_model_config;
pub mod llm_provider;
