//! Natural language query parser
//!
//! Fills the query-parsing template, asks the language model for JSON and
//! decodes it leniently into a [`ParsedQueryContext`]. Undecodable output never
//! fails the caller: it degrades to an empty context carrying the raw query.

use super::LLMClient;
use crate::clock::{Clock, SystemClock};
use crate::error::{PineQueryError, Result};
use crate::prompt::{self, PromptId, PromptSource};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Structured intent decoded from a natural-language query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedQueryContext {
    /// Exact-match author
    pub author: Option<String>,

    /// Tags for set-membership filtering, in model order
    #[serde(default)]
    pub tags: Vec<String>,

    /// Publication date parts
    pub date_info: Option<DateInfo>,

    /// The caller's query, verbatim
    pub semantic_query: String,

    /// Model-reported confidence, not clamped
    #[serde(default)]
    pub confidence: f64,
}

impl ParsedQueryContext {
    /// Context with every field at its default
    pub fn fallback(query: &str) -> Self {
        Self {
            semantic_query: query.to_string(),
            ..Self::default()
        }
    }
}

/// Date parts, each independently optional
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateInfo {
    pub year: Option<i64>,
    pub month: Option<i64>,
    pub day: Option<i64>,
}

/// Query parser backed by a language model
pub struct QueryParser {
    client: Arc<dyn LLMClient>,
    prompts: Arc<dyn PromptSource>,
    clock: Arc<dyn Clock>,
}

impl QueryParser {
    /// Create from LLM client and prompt source, using the system clock
    pub fn new(client: Arc<dyn LLMClient>, prompts: Arc<dyn PromptSource>) -> Self {
        Self {
            client,
            prompts,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the time source used for "last year" / "this year"
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Build the filled parsing prompt. Year anchors are read from the clock per call.
    pub fn build_prompt(&self, query: &str) -> Result<String> {
        let template = self.prompts.load(PromptId::QueryParser)?;
        let this_year = self.clock.current_year();
        let last_year = (this_year - 1).to_string();
        let this_year = this_year.to_string();

        Ok(prompt::fill(
            &template,
            &[
                (prompt::QUERY, query),
                (prompt::LAST_YEAR, last_year.as_str()),
                (prompt::THIS_YEAR, this_year.as_str()),
            ],
        ))
    }

    /// Parse natural language query
    ///
    /// Fails only when the template is missing or the model is unreachable.
    pub async fn parse(&self, query: &str) -> Result<ParsedQueryContext> {
        let prompt = self.build_prompt(query)?;
        let response = self.client.generate(&prompt, true).await?;

        match decode_response(&response, query) {
            Ok(context) => Ok(context),
            Err(e) => {
                tracing::warn!(
                    provider = self.client.provider_name(),
                    error = %e,
                    output = %truncate(&response, 200),
                    "no valid JSON in model response, using empty query context"
                );
                Ok(ParsedQueryContext::fallback(query))
            }
        }
    }
}

/// Decode model output into a context. `semantic_query` always comes from `original_query`.
pub fn decode_response(response: &str, original_query: &str) -> Result<ParsedQueryContext> {
    // Tolerate markdown fences or prose around the object
    let json_str = match (response.find('{'), response.rfind('}')) {
        (Some(start), Some(end)) if start < end => &response[start..=end],
        _ => response.trim(),
    };

    let parsed: Value = serde_json::from_str(json_str)
        .map_err(|e| PineQueryError::MalformedModelOutput(e.to_string()))?;

    let object = parsed.as_object().ok_or_else(|| {
        PineQueryError::MalformedModelOutput("top-level JSON value is not an object".to_string())
    })?;

    let author = object
        .get("author")
        .and_then(Value::as_str)
        .map(str::to_string);

    let tags = object
        .get("tags")
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let date_info = object
        .get("date_info")
        .and_then(Value::as_object)
        .map(|date| DateInfo {
            year: date.get("year").and_then(as_integer),
            month: date.get("month").and_then(as_integer),
            day: date.get("day").and_then(as_integer),
        });

    let confidence = object
        .get("confidence")
        .and_then(Value::as_f64)
        .unwrap_or(0.0);

    Ok(ParsedQueryContext {
        author,
        tags,
        date_info,
        semantic_query: original_query.to_string(),
        confidence,
    })
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::prompt::InMemoryPrompts;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct ScriptedClient {
        reply: String,
        prompts: Mutex<Vec<(String, bool)>>,
    }

    impl ScriptedClient {
        fn new(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.to_string(),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LLMClient for ScriptedClient {
        async fn generate(&self, prompt: &str, want_json: bool) -> Result<String> {
            self.prompts
                .lock()
                .unwrap()
                .push((prompt.to_string(), want_json));
            Ok(self.reply.clone())
        }

        fn provider_name(&self) -> &str {
            "scripted"
        }

        fn model_name(&self) -> &str {
            "scripted-1"
        }
    }

    struct DownClient;

    #[async_trait]
    impl LLMClient for DownClient {
        async fn generate(&self, _prompt: &str, _want_json: bool) -> Result<String> {
            Err(PineQueryError::llm("down", "connection refused"))
        }

        fn provider_name(&self) -> &str {
            "down"
        }

        fn model_name(&self) -> &str {
            "down-1"
        }
    }

    fn parser_with(client: Arc<dyn LLMClient>) -> QueryParser {
        let prompts = InMemoryPrompts::new().with(
            PromptId::QueryParser,
            "q={{QUERY}} last={{LAST_YEAR}} this={{THIS_YEAR}}",
        );
        QueryParser::new(client, Arc::new(prompts)).with_clock(Arc::new(FixedClock(2026)))
    }

    #[tokio::test]
    async fn test_parse_full_response() {
        let client = ScriptedClient::new(
            r#"{"author":"Akainu","tags":["news"],"date_info":{"year":2024},"confidence":0.9}"#,
        );
        let parser = parser_with(client.clone());

        let context = parser
            .parse("articles by Akainu tagged news from 2024")
            .await
            .unwrap();

        assert_eq!(context.author.as_deref(), Some("Akainu"));
        assert_eq!(context.tags, vec!["news".to_string()]);
        assert_eq!(
            context.date_info,
            Some(DateInfo {
                year: Some(2024),
                month: None,
                day: None
            })
        );
        assert_eq!(context.confidence, 0.9);
        assert_eq!(
            context.semantic_query,
            "articles by Akainu tagged news from 2024"
        );

        let calls = client.prompts.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].0,
            "q=articles by Akainu tagged news from 2024 last=2025 this=2026"
        );
        assert!(calls[0].1, "parser must request JSON output");
    }

    #[tokio::test]
    async fn test_invalid_json_falls_back() {
        for reply in ["not json at all", "", "{\"author\": ", "[1, 2, 3]", "\"text\""] {
            let parser = parser_with(ScriptedClient::new(reply));
            let context = parser.parse("rust async").await.unwrap();

            assert_eq!(context, ParsedQueryContext::fallback("rust async"), "reply: {reply:?}");
            assert_eq!(context.confidence, 0.0);
        }
    }

    #[tokio::test]
    async fn test_semantic_query_ignores_model_echo() {
        let parser = parser_with(ScriptedClient::new(
            r#"{"semantic_query":"something else","confidence":0.4}"#,
        ));
        let context = parser.parse("original words").await.unwrap();
        assert_eq!(context.semantic_query, "original words");
        assert_eq!(context.confidence, 0.4);
    }

    #[tokio::test]
    async fn test_llm_failure_propagates() {
        let parser = parser_with(Arc::new(DownClient));
        let err = parser.parse("anything").await.unwrap_err();
        assert!(matches!(err, PineQueryError::LlmUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_missing_template() {
        let parser = QueryParser::new(
            ScriptedClient::new("{}"),
            Arc::new(InMemoryPrompts::new()),
        );
        let err = parser.parse("anything").await.unwrap_err();
        assert!(matches!(err, PineQueryError::TemplateNotFound(_)));
    }

    #[test]
    fn test_decode_missing_fields_use_defaults() {
        let context = decode_response("{}", "q").unwrap();
        assert_eq!(context, ParsedQueryContext::fallback("q"));
    }

    #[test]
    fn test_decode_lenient_field_types() {
        let context = decode_response(
            r#"{"author": 42, "tags": ["a", 1, null, "b"], "date_info": "2024", "confidence": "high"}"#,
            "q",
        )
        .unwrap();

        assert_eq!(context.author, None);
        assert_eq!(context.tags, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(context.date_info, None);
        assert_eq!(context.confidence, 0.0);
    }

    #[test]
    fn test_decode_date_parts() {
        let context = decode_response(
            r#"{"date_info": {"year": "2023", "month": 7, "day": null}}"#,
            "q",
        )
        .unwrap();
        assert_eq!(
            context.date_info,
            Some(DateInfo {
                year: Some(2023),
                month: Some(7),
                day: None
            })
        );
    }

    #[test]
    fn test_decode_fenced_output() {
        let response = "```json\n{\"author\": \"Ada\", \"confidence\": 1.2}\n```";
        let context = decode_response(response, "q").unwrap();
        assert_eq!(context.author.as_deref(), Some("Ada"));
        // Confidence is passed through unclamped
        assert_eq!(context.confidence, 1.2);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("abc", 5), "abc");
        assert_eq!(truncate("abcdef", 3), "abc...");
    }
}
