//! Keyword-based query classification.
//!
//! Rules are checked in table order and the first rule with any keyword
//! contained in the lowercased query wins. Matching is plain substring
//! search, so `"how"` also matches `"show"` and `"events"` matches `"prevents"`.

use serde::Serialize;

/// Retrieval strategy chosen for a question.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    CharacterAnalysis,
    PlotSummary,
    DetailQuery,
    Comparison,
    General,
}

impl QueryKind {
    /// Wire name, e.g. `character_analysis`.
    pub fn as_str(self) -> &'static str {
        match self {
            QueryKind::CharacterAnalysis => "character_analysis",
            QueryKind::PlotSummary => "plot_summary",
            QueryKind::DetailQuery => "detail_query",
            QueryKind::Comparison => "comparison",
            QueryKind::General => "general",
        }
    }

    /// Display label, e.g. `Character Analysis`.
    pub fn label(self) -> &'static str {
        match self {
            QueryKind::CharacterAnalysis => "Character Analysis",
            QueryKind::PlotSummary => "Plot Summary",
            QueryKind::DetailQuery => "Detail Query",
            QueryKind::Comparison => "Comparison",
            QueryKind::General => "General",
        }
    }
}

impl std::fmt::Display for QueryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification result for one query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct QueryAnalysis {
    pub kind: QueryKind,
    /// How many ranked passages to consider.
    pub k_docs: usize,
    /// Whitespace-separated word count.
    pub complexity: usize,
}

struct Rule {
    keywords: &'static [&'static str],
    kind: QueryKind,
    k_docs: usize,
}

const RULES: &[Rule] = &[
    Rule {
        keywords: &["who is", "tell me about", "describe", "character"],
        kind: QueryKind::CharacterAnalysis,
        k_docs: 4,
    },
    Rule {
        keywords: &["summarize", "summary", "what happens", "events", "plot"],
        kind: QueryKind::PlotSummary,
        k_docs: 6,
    },
    Rule {
        keywords: &["how", "why", "what", "where", "when", "trivia"],
        kind: QueryKind::DetailQuery,
        k_docs: 3,
    },
    Rule {
        keywords: &["compare", "difference", "vs", "versus"],
        kind: QueryKind::Comparison,
        k_docs: 5,
    },
];

const GENERAL_K_DOCS: usize = 5;

/// Classifies `query` into a [`QueryAnalysis`]. Pure and deterministic.
pub fn analyze_query(query: &str) -> QueryAnalysis {
    let lower = query.to_lowercase();
    let (kind, k_docs) = RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|kw| lower.contains(kw)))
        .map(|rule| (rule.kind, rule.k_docs))
        .unwrap_or((QueryKind::General, GENERAL_K_DOCS));

    QueryAnalysis {
        kind,
        k_docs,
        complexity: query.split_whitespace().count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(q: &str) -> QueryKind {
        analyze_query(q).kind
    }

    #[test]
    fn keyword_table() {
        assert_eq!(kind("Who is Severus Snape?"), QueryKind::CharacterAnalysis);
        assert_eq!(kind("Tell me about Luna"), QueryKind::CharacterAnalysis);
        assert_eq!(kind("Summarize the Triwizard Tournament"), QueryKind::PlotSummary);
        assert_eq!(kind("Key events of book five"), QueryKind::PlotSummary);
        assert_eq!(kind("Where is the Burrow?"), QueryKind::DetailQuery);
        assert_eq!(kind("Compare Gryffindor and Slytherin"), QueryKind::Comparison);
        assert_eq!(kind("Quidditch"), QueryKind::General);
    }

    #[test]
    fn priority_order_wins() {
        // "what happens" is plot, checked before the bare "what" of detail queries.
        assert_eq!(kind("What happens in the Battle of Hogwarts?"), QueryKind::PlotSummary);
        // "describe" beats "how".
        assert_eq!(kind("Describe how Harry met Ron"), QueryKind::CharacterAnalysis);
        // "what" beats "difference".
        assert_eq!(
            kind("What is the difference between a Horcrux and a Hallow?"),
            QueryKind::DetailQuery
        );
    }

    #[test]
    fn substring_matching_is_literal() {
        assert_eq!(kind("Show me the Marauder's Map"), QueryKind::DetailQuery);
        assert_eq!(kind("The Quibbler prevents nargles"), QueryKind::PlotSummary);
    }

    #[test]
    fn case_insensitive() {
        assert_eq!(kind("WHO IS DOBBY"), QueryKind::CharacterAnalysis);
    }

    #[test]
    fn k_docs_and_complexity() {
        assert_eq!(
            analyze_query("Who is Dobby"),
            QueryAnalysis {
                kind: QueryKind::CharacterAnalysis,
                k_docs: 4,
                complexity: 3,
            }
        );
        assert_eq!(analyze_query("plot of book 7").k_docs, 6);
        assert_eq!(analyze_query("why").k_docs, 3);
        assert_eq!(analyze_query("Harry versus Voldemort").k_docs, 5);
        assert_eq!(analyze_query("Nimbus").k_docs, 5);
        assert_eq!(analyze_query("  spaced   out  ").complexity, 2);
    }

    #[test]
    fn labels() {
        assert_eq!(QueryKind::CharacterAnalysis.label(), "Character Analysis");
        assert_eq!(QueryKind::DetailQuery.to_string(), "detail_query");
    }
}
