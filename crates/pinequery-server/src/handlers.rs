//! Route handlers

use crate::protocol::*;
use crate::server::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pinequery_core::PineQueryError;
use serde_json::json;

/// Error rendered as `{"detail": ...}`
pub(crate) struct ApiError(PineQueryError);

impl From<PineQueryError> for ApiError {
    fn from(err: PineQueryError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        tracing::error!(status = status.as_u16(), error = %self.0, "request failed");

        let body = ErrorResponse {
            detail: format!("Error processing query: {}", self.0),
        };
        (status, Json(body)).into_response()
    }
}

pub(crate) async fn root(State(app): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "message": "PineQuery natural-language search agent",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Uses an LLM to turn natural-language queries into vector-search filters",
        "endpoints": {
            "POST /query": "Convert natural language to a metadata filter",
            "POST /search_record": "Search records matching the query in the vector store",
            "POST /generate_rag_response": "Answer the query using retrieved records as context"
        },
        "supported_providers": app.factory.providers()
    }))
}

pub(crate) async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn process_query(
    State(app): State<AppState>,
    Json(req): Json<QueryRequest>,
) -> Result<Json<QueryParsedResponse>, ApiError> {
    let agent = app.factory.agent(&req.llm_provider)?;
    let outcome = agent.process_query(&req.query).await?;

    Ok(Json(QueryParsedResponse {
        query: req.query,
        filter: outcome.filter,
        confidence: outcome.confidence,
        timestamp: timestamp(),
    }))
}

pub(crate) async fn search_record(
    State(app): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<DocumentSearchResponse>, ApiError> {
    let agent = app.factory.agent(&req.llm_provider)?;
    let records = agent
        .search_records(&req.query, &req.pinecone_index, &req.pinecone_spacename)
        .await?;

    Ok(Json(DocumentSearchResponse {
        query: req.query,
        search_records: records,
        timestamp: timestamp(),
    }))
}

pub(crate) async fn generate_rag_response(
    State(app): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<RagResponse>, ApiError> {
    let agent = app.factory.agent(&req.llm_provider)?;
    let answer = agent
        .generate_answer(&req.query, &req.pinecone_index, &req.pinecone_spacename)
        .await?;

    Ok(Json(RagResponse {
        query: req.query,
        answer: answer.unwrap_or_default(),
        timestamp: timestamp(),
    }))
}
