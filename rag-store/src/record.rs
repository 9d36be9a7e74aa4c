//! Core data models used by the library.

use serde::Serialize;
use serde_json::Value;

/// Payload key used when the configured content key is absent.
const FALLBACK_CONTENT_KEY: &str = "text";

/// A single retrieval hit with score, text and source.
#[derive(Clone, Debug, Serialize)]
pub struct RagHit {
    pub score: f32,
    pub text: String,
    pub source: Option<String>,
    #[serde(skip)]
    pub raw_payload: Value,
}

impl RagHit {
    /// Builds a hit from a Qdrant payload.
    ///
    /// Text comes from `content_key` (LangChain: `page_content`) or `text`.
    /// Source is read from `metadata.source` or a top-level `source`.
    pub fn from_payload(score: f32, payload: Value, content_key: &str) -> Self {
        let text = payload
            .get(content_key)
            .and_then(Value::as_str)
            .or_else(|| payload.get(FALLBACK_CONTENT_KEY).and_then(Value::as_str))
            .unwrap_or_default()
            .to_string();
        let source = payload
            .pointer("/metadata/source")
            .or_else(|| payload.get("source"))
            .and_then(Value::as_str)
            .map(str::to_string);

        Self {
            score,
            text,
            source,
            raw_payload: payload,
        }
    }

    /// Char-safe preview for logs and diagnostics.
    pub fn preview(&self, max_chars: usize) -> String {
        let flat: String = self
            .text
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        if flat.chars().count() <= max_chars {
            flat
        } else {
            let mut s: String = flat.chars().take(max_chars).collect();
            s.push('…');
            s
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_langchain_payload() {
        let hit = RagHit::from_payload(
            0.8,
            json!({ "page_content": "The boy who lived", "metadata": { "source": "hp1.pdf" } }),
            "page_content",
        );
        assert_eq!(hit.text, "The boy who lived");
        assert_eq!(hit.source.as_deref(), Some("hp1.pdf"));
    }

    #[test]
    fn falls_back_to_text_key() {
        let hit = RagHit::from_payload(0.1, json!({ "text": "Nimbus 2000", "source": "hp1" }), "page_content");
        assert_eq!(hit.text, "Nimbus 2000");
        assert_eq!(hit.source.as_deref(), Some("hp1"));

        let empty = RagHit::from_payload(0.1, json!({ "other": 1 }), "page_content");
        assert!(empty.text.is_empty());
        assert!(empty.source.is_none());
    }

    #[test]
    fn preview_is_flattened_and_clamped() {
        let hit = RagHit::from_payload(0.0, json!({ "text": "Ministry\n\n  of   Magic" }), "text");
        assert_eq!(hit.preview(100), "Ministry of Magic");
        assert_eq!(hit.preview(8), "Ministry…");
    }
}
