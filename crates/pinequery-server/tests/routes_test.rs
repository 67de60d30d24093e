//! Route tests against an in-process router

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use pinequery_core::{
    AgentFactory, FilterExpression, IndexHandle, InMemoryPrompts, LLMClient, LLMServiceConfig,
    PineQueryError, PromptId, ProviderRegistry, Result, RetrievedRecord, VectorSearchClient,
};
use pinequery_server::{router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

struct FixedLLM {
    json_reply: &'static str,
    text_reply: &'static str,
}

#[async_trait]
impl LLMClient for FixedLLM {
    async fn generate(&self, _prompt: &str, want_json: bool) -> Result<String> {
        Ok(if want_json {
            self.json_reply
        } else {
            self.text_reply
        }
        .to_string())
    }

    fn provider_name(&self) -> &str {
        "fixed"
    }

    fn model_name(&self) -> &str {
        "fixed-1"
    }
}

struct FixedSearch {
    known_index: &'static str,
    records: Vec<Value>,
}

#[async_trait]
impl VectorSearchClient for FixedSearch {
    async fn describe_index(&self, name: &str) -> Result<IndexHandle> {
        if name != self.known_index {
            return Err(PineQueryError::SearchInfrastructureUnreachable {
                index: name.to_string(),
                message: "not found".to_string(),
            });
        }
        Ok(IndexHandle {
            name: name.to_string(),
            host: "localhost".to_string(),
        })
    }

    async fn search(
        &self,
        _index: &IndexHandle,
        _namespace: &str,
        _query_text: &str,
        _filter: &FilterExpression,
        _top_k: usize,
    ) -> Result<Vec<RetrievedRecord>> {
        Ok(self
            .records
            .iter()
            .map(|r| serde_json::from_value(r.clone()).unwrap())
            .collect())
    }
}

fn fixed_registry() -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();
    registry.register_client(
        "gemini",
        Arc::new(FixedLLM {
            json_reply: r#"{"author":"Akainu","tags":["news"],"date_info":{"year":2024},"confidence":0.9}"#,
            text_reply: "Akainu covers the news.",
        }),
    );
    registry
}

fn full_prompts() -> InMemoryPrompts {
    InMemoryPrompts::new()
        .with(PromptId::QueryParser, "{{QUERY}}")
        .with(PromptId::RagSearch, "{{CONTEXT}} {{QUERY}}")
}

fn app_with(registry: ProviderRegistry, prompts: InMemoryPrompts, records: Vec<Value>) -> axum::Router {
    let factory = AgentFactory::new(
        registry,
        LLMServiceConfig::default(),
        Arc::new(FixedSearch {
            known_index: "articles",
            records,
        }),
        Arc::new(prompts),
    );
    router(AppState::new(factory))
}

fn app(records: Vec<Value>) -> axum::Router {
    app_with(fixed_registry(), full_prompts(), records)
}

async fn post(app: axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_root_lists_providers() {
    let response = app(vec![])
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["supported_providers"], json!(["gemini"]));
    assert!(body["endpoints"]["POST /query"].is_string());
}

#[tokio::test]
async fn test_query_returns_filter() {
    let (status, body) = post(
        app(vec![]),
        "/query",
        json!({"query": "articles by Akainu tagged news from 2024", "llm_provider": "gemini"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["query"], "articles by Akainu tagged news from 2024");
    assert_eq!(
        body["filter"],
        json!({
            "author": "Akainu",
            "tags": {"$in": ["news"]},
            "published_year": {"$eq": 2024}
        })
    );
    assert_eq!(body["confidence"], 0.9);
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_unsupported_provider_is_bad_request() {
    let (status, body) = post(
        app(vec![]),
        "/query",
        json!({"query": "q", "llm_provider": "openai"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("Error processing query:"));
    assert!(detail.contains("openai"));
}

#[tokio::test]
async fn test_search_record() {
    let (status, body) = post(
        app(vec![json!({"text": "harbour news", "author": "Akainu"})]),
        "/search_record",
        json!({
            "query": "news by Akainu",
            "llm_provider": "gemini",
            "pinecone_index": "articles",
            "pinecone_spacename": "prod"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["search_records"],
        json!([{"text": "harbour news", "author": "Akainu"}])
    );
}

#[tokio::test]
async fn test_search_record_unknown_index_is_server_error() {
    let (status, body) = post(
        app(vec![]),
        "/search_record",
        json!({
            "query": "q",
            "llm_provider": "gemini",
            "pinecone_index": "nope",
            "pinecone_spacename": "prod"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().contains("nope"));
}

#[tokio::test]
async fn test_rag_response() {
    let (status, body) = post(
        app(vec![json!({"text": "harbour news"})]),
        "/generate_rag_response",
        json!({
            "query": "summarize Akainu",
            "llm_provider": "gemini",
            "pinecone_index": "articles",
            "pinecone_spacename": "prod"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["answer"], "Akainu covers the news.");
}

#[tokio::test]
async fn test_rag_response_without_context_is_empty() {
    let (status, body) = post(
        app(vec![]),
        "/generate_rag_response",
        json!({
            "query": "summarize Akainu",
            "llm_provider": "gemini",
            "pinecone_index": "articles",
            "pinecone_spacename": "prod"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["answer"], "");
}

#[tokio::test]
async fn test_missing_template_is_server_error() {
    let search = json!({
        "query": "summarize Akainu",
        "llm_provider": "gemini",
        "pinecone_index": "articles",
        "pinecone_spacename": "prod"
    });
    let records = vec![json!({"text": "harbour news"})];

    for (uri, body) in [
        ("/query", json!({"query": "q", "llm_provider": "gemini"})),
        ("/search_record", search.clone()),
        ("/generate_rag_response", search),
    ] {
        let (status, body) = post(
            app_with(fixed_registry(), InMemoryPrompts::new(), records.clone()),
            uri,
            body,
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert!(body["detail"]
            .as_str()
            .unwrap()
            .starts_with("Error processing query:"));
    }
}

#[tokio::test]
async fn test_provider_setup_failure_is_server_error() {
    let mut registry = ProviderRegistry::new();
    registry.register("gemini", |_| {
        Err(PineQueryError::Config("Gemini API key missing".to_string()))
    });

    let (status, body) = post(
        app_with(registry, full_prompts(), vec![]),
        "/query",
        json!({"query": "q", "llm_provider": "gemini"}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().contains("API key missing"));
}
