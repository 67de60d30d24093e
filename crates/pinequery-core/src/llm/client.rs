//! HTTP client for external language-model services

use crate::config::LLMServiceConfig;
use crate::error::{PineQueryError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Trait for language-model clients
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate text for a prompt, optionally constrained to JSON output
    async fn generate(&self, prompt: &str, want_json: bool) -> Result<String>;

    /// Provider identifier (e.g. "gemini")
    fn provider_name(&self) -> &str;

    /// Get model name
    fn model_name(&self) -> &str;
}

/// Gemini `generateContent` client
pub struct GeminiClient {
    http_client: reqwest::Client,
    config: LLMServiceConfig,
}

impl GeminiClient {
    pub const PROVIDER: &'static str = "gemini";

    /// Create new Gemini client from configuration
    pub fn new(config: LLMServiceConfig) -> Result<Self> {
        if config.api_key.as_deref().map_or(true, str::is_empty) {
            return Err(PineQueryError::Config(
                "Gemini API key missing (set GEMINI_API_KEY or llm.api_key)".to_string(),
            ));
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(PineQueryError::Http)?;

        Ok(Self {
            http_client,
            config,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "GenerationConfig::is_empty")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize, Default)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

impl GenerationConfig {
    fn is_empty(&self) -> bool {
        self.response_mime_type.is_none() && self.temperature.is_none()
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        Some(text)
    }
}

#[async_trait]
impl LLMClient for GeminiClient {
    async fn generate(&self, prompt: &str, want_json: bool) -> Result<String> {
        let start = Instant::now();

        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: want_json.then_some("application/json"),
                temperature: self.config.temperature,
            },
        };

        let mut req = self.http_client.post(self.endpoint()).json(&request);
        if let Some(ref api_key) = self.config.api_key {
            req = req.header("x-goog-api-key", api_key);
        }

        let response = req
            .send()
            .await
            .map_err(|e| PineQueryError::llm(Self::PROVIDER, e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PineQueryError::llm(
                Self::PROVIDER,
                format!("HTTP {}: {}", status, body),
            ));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| PineQueryError::llm(Self::PROVIDER, e.to_string()))?;

        let text = body
            .text()
            .ok_or_else(|| PineQueryError::llm(Self::PROVIDER, "No candidates in response"))?;

        tracing::debug!(
            provider = Self::PROVIDER,
            model = %self.config.model,
            want_json,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "generation complete"
        );

        Ok(text)
    }

    fn provider_name(&self) -> &str {
        Self::PROVIDER
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
