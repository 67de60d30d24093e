//! Vector search
//!
//! Provides:
//! - The vector-search client trait and its Pinecone implementation
//! - Search orchestration: index resolution, filter building and top-K retrieval

mod orchestrated;
mod pinecone;

pub use orchestrated::{SearchOrchestrator, DEFAULT_TOP_K};
pub use pinecone::PineconeClient;

use crate::error::Result;
use crate::filter::FilterExpression;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Resolved, queryable index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexHandle {
    /// Index name as requested
    pub name: String,
    /// Data-plane host serving the index
    pub host: String,
}

/// Field map returned by the search backend
///
/// `text` is required for answer synthesis; every other field is passed through.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RetrievedRecord(Map<String, Value>);

impl RetrievedRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// The record's `text` field when it is a string
    pub fn text(&self) -> Option<&str> {
        self.0.get("text").and_then(Value::as_str)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for RetrievedRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Trait for vector-search backends
#[async_trait]
pub trait VectorSearchClient: Send + Sync {
    /// Resolve an index name to a live handle
    async fn describe_index(&self, name: &str) -> Result<IndexHandle>;

    /// Similarity search with an attached metadata filter, at most `top_k` records
    async fn search(
        &self,
        index: &IndexHandle,
        namespace: &str,
        query_text: &str,
        filter: &FilterExpression,
        top_k: usize,
    ) -> Result<Vec<RetrievedRecord>>;
}
