//! Pinecone client using integrated-inference text search

use super::{IndexHandle, RetrievedRecord, VectorSearchClient};
use crate::config::SearchServiceConfig;
use crate::error::{PineQueryError, Result};
use crate::filter::FilterExpression;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use reqwest::Url;
use std::time::Duration;

/// Pinecone control- and data-plane client
pub struct PineconeClient {
    http_client: reqwest::Client,
    config: SearchServiceConfig,
}

impl PineconeClient {
    /// Create new Pinecone client from configuration
    pub fn new(config: SearchServiceConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(PineQueryError::Http)?;

        Ok(Self {
            http_client,
            config,
        })
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        let mut req = self
            .http_client
            .request(method, url)
            .header("X-Pinecone-API-Version", &self.config.api_version);
        if let Some(ref api_key) = self.config.api_key {
            req = req.header("Api-Key", api_key);
        }
        req
    }
}

#[derive(Deserialize)]
struct DescribeIndexResponse {
    host: String,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    query: SearchQuery<'a>,
}

#[derive(Serialize)]
struct SearchQuery<'a> {
    inputs: SearchInputs<'a>,
    top_k: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<Value>,
}

#[derive(Serialize)]
struct SearchInputs<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct SearchResponse {
    result: SearchResult,
}

#[derive(Deserialize)]
struct SearchResult {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Deserialize)]
struct Hit {
    #[serde(default)]
    fields: Map<String, Value>,
}

fn search_body<'a>(query_text: &'a str, filter: &FilterExpression, top_k: usize) -> SearchRequest<'a> {
    SearchRequest {
        query: SearchQuery {
            inputs: SearchInputs { text: query_text },
            top_k,
            filter: (!filter.is_empty()).then(|| filter.to_value()),
        },
    }
}

fn data_plane_url(host: &str) -> String {
    if host.starts_with("http://") || host.starts_with("https://") {
        host.trim_end_matches('/').to_string()
    } else {
        format!("https://{}", host.trim_end_matches('/'))
    }
}

/// Append percent-encoded path segments to `base`
fn join_segments(base: &str, segments: &[&str]) -> std::result::Result<Url, String> {
    let mut url = Url::parse(base).map_err(|e| format!("invalid URL '{}': {}", base, e))?;
    url.path_segments_mut()
        .map_err(|_| format!("URL '{}' cannot take a path", base))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn describe_url(control_url: &str, index_name: &str) -> std::result::Result<Url, String> {
    join_segments(control_url, &["indexes", index_name])
}

fn search_url(host: &str, namespace: &str) -> std::result::Result<Url, String> {
    join_segments(
        &data_plane_url(host),
        &["records", "namespaces", namespace, "search"],
    )
}

#[async_trait]
impl VectorSearchClient for PineconeClient {
    async fn describe_index(&self, name: &str) -> Result<IndexHandle> {
        let unreachable = |message: String| PineQueryError::SearchInfrastructureUnreachable {
            index: name.to_string(),
            message,
        };

        if name.trim().is_empty() {
            return Err(unreachable("index name is empty".to_string()));
        }

        let url = describe_url(&self.config.control_url, name).map_err(unreachable)?;

        let response = self
            .request(reqwest::Method::GET, url)
            .send()
            .await
            .map_err(|e| unreachable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(unreachable(format!("HTTP {}: {}", status, body)));
        }

        let description: DescribeIndexResponse = response
            .json()
            .await
            .map_err(|e| unreachable(e.to_string()))?;

        tracing::debug!(index = name, host = %description.host, "resolved index host");

        Ok(IndexHandle {
            name: name.to_string(),
            host: description.host,
        })
    }

    async fn search(
        &self,
        index: &IndexHandle,
        namespace: &str,
        query_text: &str,
        filter: &FilterExpression,
        top_k: usize,
    ) -> Result<Vec<RetrievedRecord>> {
        let url = search_url(&index.host, namespace).map_err(PineQueryError::SearchQueryFailed)?;

        let response = self
            .request(reqwest::Method::POST, url)
            .json(&search_body(query_text, filter, top_k))
            .send()
            .await
            .map_err(|e| PineQueryError::SearchQueryFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PineQueryError::SearchQueryFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| PineQueryError::SearchQueryFailed(e.to_string()))?;

        Ok(body
            .result
            .hits
            .into_iter()
            .map(|hit| RetrievedRecord::new(hit.fields))
            .collect())
    }
}
