//! Metadata filter construction
//!
//! Maps a [`ParsedQueryContext`] onto the vector-search filter language:
//! `author` as a bare exact match, `tags` as `$in`, and each date part as `$eq`.
//! A key is present only when its source field is present and non-empty.

use crate::llm::ParsedQueryContext;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

pub const AUTHOR: &str = "author";
pub const TAGS: &str = "tags";
pub const PUBLISHED_YEAR: &str = "published_year";
pub const PUBLISHED_MONTH: &str = "published_month";
pub const PUBLISHED_DAY: &str = "published_day";

/// Field name to predicate. Key order never affects equality or serialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterExpression(BTreeMap<String, Value>);

impl FilterExpression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, predicate: Value) {
        self.0.insert(key.into(), predicate);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// JSON object form sent to the search backend
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone().into_iter().collect())
    }

    /// Lowercase, trim and remove interior spaces from every `tags.$in` value
    pub fn normalize_tags(&mut self) {
        let Some(values) = self
            .0
            .get_mut(TAGS)
            .and_then(|p| p.get_mut("$in"))
            .and_then(Value::as_array_mut)
        else {
            return;
        };

        for value in values.iter_mut() {
            if let Some(tag) = value.as_str() {
                *value = Value::String(normalize_tag(tag));
            }
        }
    }
}

fn normalize_tag(tag: &str) -> String {
    tag.trim().to_lowercase().replace(' ', "")
}

/// Build the search filter for a parsed query. Pure and deterministic.
pub fn build_filter(context: &ParsedQueryContext) -> FilterExpression {
    let mut filter = FilterExpression::new();

    if let Some(author) = context.author.as_deref().filter(|a| !a.is_empty()) {
        filter.insert(AUTHOR, Value::String(author.to_string()));
    }

    if !context.tags.is_empty() {
        filter.insert(TAGS, json!({ "$in": context.tags }));
    }

    if let Some(date) = context.date_info {
        let parts = [
            (PUBLISHED_YEAR, date.year),
            (PUBLISHED_MONTH, date.month),
            (PUBLISHED_DAY, date.day),
        ];
        for (key, part) in parts {
            if let Some(value) = part {
                filter.insert(key, json!({ "$eq": value }));
            }
        }
    }

    filter
}
