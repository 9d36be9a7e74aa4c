//! User-facing strings produced by the response assembler.

use crate::classify::QueryKind;

pub const EMPTY_QUERY: &str = "🪄 Please cast a question spell by typing your query!";

pub const NOT_INITIALIZED: &str = "🚨 RAG system not initialized. Please check the setup.";

pub const NO_CONTEXT: &str = "🔍 I couldn't find relevant information in the Harry Potter books for your query. Try rephrasing your question or asking about specific characters, events, or magical elements.";

/// Frames a model answer with the passage count and query type.
pub fn answered(answer: &str, passages: usize, kind: QueryKind) -> String {
    format!(
        "🔮 **Magical Knowledge Retrieved:**\n\n{answer}\n\n---\n✨ *Answer compiled from {passages} relevant passages across the Harry Potter books*  \n🏰 *Query type: {}*",
        kind.label()
    )
}

/// Frames a degraded answer (every model unavailable).
pub fn degraded(text: &str) -> String {
    format!("🧙‍♂️ **Magical Response:** {text}")
}

pub fn malfunction(error: &dyn std::fmt::Display) -> String {
    format!("🚨 **Spell Malfunction:** An error occurred in the magical pipeline: {error}")
}
