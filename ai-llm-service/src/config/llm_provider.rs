/// Represents the provider (backend) used for large language model (LLM) calls.
///
/// # Examples
///
/// ```
/// use ai_llm_service::LlmProvider;
///
/// fn describe(provider: LlmProvider) -> &'static str {
///     match provider {
///         LlmProvider::Groq => "hosted chat completions",
///         LlmProvider::Ollama => "local embeddings",
///     }
/// }
/// assert_eq!(describe(LlmProvider::Groq), "hosted chat completions");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    /// Groq's OpenAI-compatible chat completion API.
    Groq,
    /// Local Ollama runtime, used here for embeddings.
    Ollama,
}
