//! Thin adapter around `qdrant-client` to isolate API usage.
//!
//! This facade concentrates all Qdrant interactions behind a minimal,
//! read-only API (existence, count, search), keeping the rest of the
//! application decoupled from `qdrant-client`.

use crate::config::RagConfig;
use crate::errors::RagError;

use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    CountPointsBuilder, SearchParamsBuilder, SearchPointsBuilder, Value as QValue,
};
use tracing::{debug, info};

/// A facade over the Qdrant client bound to one collection.
pub struct QdrantFacade {
    pub(crate) client: Qdrant,
    pub(crate) collection: String,
}

impl QdrantFacade {
    /// Creates a new facade from the given configuration.
    ///
    /// Supports optional API key authentication. No network call is made
    /// here; the first request opens the channel.
    pub fn new(cfg: &RagConfig) -> Result<Self, RagError> {
        cfg.validate()?;

        let mut builder = Qdrant::from_url(&cfg.qdrant_url);
        if let Some(key) = &cfg.qdrant_api_key {
            builder = builder.api_key(key.clone());
        }
        let client = builder
            .build()
            .map_err(|e| RagError::Qdrant(e.to_string()))?;

        info!(
            url = %cfg.qdrant_url,
            collection = %cfg.collection,
            "Qdrant client created"
        );

        Ok(Self {
            client,
            collection: cfg.collection.clone(),
        })
    }

    /// Whether the configured collection exists.
    pub async fn collection_exists(&self) -> Result<bool, RagError> {
        self.client
            .collection_exists(&self.collection)
            .await
            .map_err(|e| RagError::Qdrant(e.to_string()))
    }

    /// Exact number of points stored in the collection.
    pub async fn count(&self) -> Result<u64, RagError> {
        let res = self
            .client
            .count(CountPointsBuilder::new(&self.collection).exact(true))
            .await
            .map_err(|e| RagError::Qdrant(e.to_string()))?;

        let count = res.result.map(|r| r.count).unwrap_or(0);
        debug!(collection = %self.collection, count, "counted points");
        Ok(count)
    }

    /// Performs a similarity search in Qdrant.
    ///
    /// Returns `(score, payload)` tuples sorted by score.
    pub async fn search(
        &self,
        vector: Vec<f32>,
        top_k: u64,
        exact: bool,
    ) -> Result<Vec<(f32, serde_json::Value)>, RagError> {
        debug!(
            collection = %self.collection,
            top_k,
            exact,
            "searching"
        );

        let mut builder =
            SearchPointsBuilder::new(&self.collection, vector, top_k).with_payload(true);
        if exact {
            builder = builder.params(SearchParamsBuilder::default().exact(true));
        }

        let res = self
            .client
            .search_points(builder)
            .await
            .map_err(|e| RagError::Qdrant(e.to_string()))?;

        let out: Vec<_> = res
            .result
            .into_iter()
            .map(|r| (r.score, qpayload_to_json(r.payload)))
            .collect();

        debug!(hits = out.len(), "search completed");
        Ok(out)
    }
}

/// Converts a Qdrant payload (`HashMap<String, qdrant::Value>`) into JSON.
///
/// Nested structs and lists (LangChain keeps `metadata` as a struct) are
/// converted recursively.
pub(crate) fn qpayload_to_json(
    p: std::collections::HashMap<String, QValue>,
) -> serde_json::Value {
    serde_json::Value::Object(p.into_iter().map(|(k, v)| (k, qvalue_to_json(v))).collect())
}

fn qvalue_to_json(v: QValue) -> serde_json::Value {
    use qdrant_client::qdrant::value::Kind as K;
    match v.kind {
        Some(K::StringValue(s)) => serde_json::Value::String(s),
        Some(K::IntegerValue(i)) => serde_json::Value::Number(i.into()),
        Some(K::DoubleValue(f)) => serde_json::json!(f),
        Some(K::BoolValue(b)) => serde_json::Value::Bool(b),
        Some(K::StructValue(s)) => qpayload_to_json(s.fields),
        Some(K::ListValue(l)) => {
            serde_json::Value::Array(l.values.into_iter().map(qvalue_to_json).collect())
        }
        Some(K::NullValue(_)) | None => serde_json::Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qdrant_client::qdrant::{ListValue, Struct, value::Kind};
    use std::collections::HashMap;

    fn kind(k: Kind) -> QValue {
        QValue { kind: Some(k) }
    }

    #[test]
    fn converts_nested_langchain_payload() {
        let metadata = HashMap::from([
            ("source".to_string(), kind(Kind::StringValue("book1.pdf".into()))),
            ("page".to_string(), kind(Kind::IntegerValue(12))),
        ]);
        let payload = HashMap::from([
            (
                "page_content".to_string(),
                kind(Kind::StringValue("Mr. and Mrs. Dursley".into())),
            ),
            (
                "metadata".to_string(),
                kind(Kind::StructValue(Struct { fields: metadata })),
            ),
            (
                "tags".to_string(),
                kind(Kind::ListValue(ListValue {
                    values: vec![kind(Kind::BoolValue(true)), QValue { kind: None }],
                })),
            ),
        ]);

        let json = qpayload_to_json(payload);

        assert_eq!(json["page_content"], "Mr. and Mrs. Dursley");
        assert_eq!(json["metadata"]["source"], "book1.pdf");
        assert_eq!(json["metadata"]["page"], 12);
        assert_eq!(json["tags"], serde_json::json!([true, null]));
    }
}
