//! Prompt builder: persona system message + strategy-specific user prompt.

use crate::classify::{QueryAnalysis, QueryKind};

/// System message sent ahead of every prompt.
pub const SYSTEM_PROMPT: &str = "You are a knowledgeable Harry Potter expert and helpful assistant. Provide detailed, accurate answers based on the given context. Reference specific books, characters, or events when possible. Maintain a warm, knowledgeable tone while being precise and informative.";

/// Separator placed between context passages.
pub const PASSAGE_SEPARATOR: &str = "\n\n---\n\n";

const BASE_INSTRUCTIONS: &str = "You are an expert on the Harry Potter series with deep knowledge of all seven books. Use the provided context to answer the user's question comprehensively and accurately.";

/// Answer-style instruction for each strategy.
pub fn instruction_for(kind: QueryKind) -> &'static str {
    match kind {
        QueryKind::CharacterAnalysis => {
            "Focus on character development, personality traits, relationships, and key moments. Reference specific books when possible."
        }
        QueryKind::PlotSummary => {
            "Organize information chronologically and provide a comprehensive overview of events. Include key details and outcomes."
        }
        QueryKind::DetailQuery => {
            "Be specific and precise with facts. Provide exact details and reference the source material."
        }
        QueryKind::Comparison => {
            "Clearly contrast the different elements being compared. Use structured comparisons and specific examples."
        }
        QueryKind::General => {
            "Provide a well-rounded answer that covers all relevant aspects of the topic."
        }
    }
}

/// Builds the user prompt from the question, selected passages and analysis.
///
/// # Example
/// ```
/// # use contextor::{analyze_query, prompt::build_prompt};
/// let analysis = analyze_query("Who is Hagrid?");
/// let prompt = build_prompt("Who is Hagrid?", &["Rubeus Hagrid, Keeper of Keys".into()], &analysis);
/// assert!(prompt.contains("**User Question:** Who is Hagrid?"));
/// ```
pub fn build_prompt(query: &str, passages: &[String], analysis: &QueryAnalysis) -> String {
    let context = passages.join(PASSAGE_SEPARATOR);
    let specific = instruction_for(analysis.kind);

    format!(
        "{BASE_INSTRUCTIONS}

**Context from Harry Potter books:**
{context}

**User Question:** {query}

**Instructions:**
- {specific}
- Reference specific books, characters, or events when relevant
- If you're not completely certain about something, acknowledge it
- Keep the magical tone but be informative and accurate
- Structure your response clearly

**Answer:**"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::analyze_query;

    #[test]
    fn layout_is_stable() {
        let analysis = analyze_query("Compare the Firebolt vs the Nimbus");
        let passages = vec!["First passage".to_string(), "Second passage".to_string()];

        let prompt = build_prompt("Compare the Firebolt vs the Nimbus", &passages, &analysis);

        let expected = format!(
            "{BASE_INSTRUCTIONS}\n\n**Context from Harry Potter books:**\nFirst passage\n\n---\n\nSecond passage\n\n**User Question:** Compare the Firebolt vs the Nimbus\n\n**Instructions:**\n- Clearly contrast the different elements being compared. Use structured comparisons and specific examples.\n- Reference specific books, characters, or events when relevant\n- If you're not completely certain about something, acknowledge it\n- Keep the magical tone but be informative and accurate\n- Structure your response clearly\n\n**Answer:**"
        );
        assert_eq!(prompt, expected);
    }

    #[test]
    fn each_kind_has_its_instruction() {
        for (query, needle) in [
            ("who is Dobby", "character development"),
            ("summarize book 3", "chronologically"),
            ("why do owls deliver mail", "exact details"),
            ("Quidditch", "well-rounded"),
        ] {
            let prompt = build_prompt(query, &["ctx".into()], &analyze_query(query));
            assert!(prompt.contains(needle), "{query}: missing {needle}");
        }
    }

    #[test]
    fn single_passage_has_no_separator() {
        let prompt = build_prompt("q", &["only".into()], &analyze_query("q"));
        assert!(!prompt.contains("---"));
    }
}
