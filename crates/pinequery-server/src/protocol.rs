//! Request and response bodies

use pinequery_core::{FilterExpression, RetrievedRecord};
use serde::{Deserialize, Serialize};

/// Body of `POST /query`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    pub llm_provider: String,
}

/// Response of `POST /query`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryParsedResponse {
    pub query: String,
    pub filter: FilterExpression,
    pub confidence: f64,
    pub timestamp: String,
}

/// Body of `POST /search_record` and `POST /generate_rag_response`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub llm_provider: String,
    pub pinecone_index: String,
    pub pinecone_spacename: String,
}

/// Response of `POST /search_record`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSearchResponse {
    pub query: String,
    pub search_records: Vec<RetrievedRecord>,
    pub timestamp: String,
}

/// Response of `POST /generate_rag_response`. No supporting context renders as `""`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagResponse {
    pub query: String,
    pub answer: String,
    pub timestamp: String,
}

/// Error body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

pub(crate) fn timestamp() -> String {
    chrono::Local::now().to_rfc3339()
}
