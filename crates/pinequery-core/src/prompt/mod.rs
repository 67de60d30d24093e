//! Prompt templates
//!
//! Templates are plain text with fixed sentinel placeholders. Filling a template
//! is literal string replacement, applied in the order the pairs are given.

use crate::error::{PineQueryError, Result};
use std::collections::HashMap;
use std::path::PathBuf;

/// Placeholder for the raw user query
pub const QUERY: &str = "{{QUERY}}";

/// Placeholder for the previous calendar year
pub const LAST_YEAR: &str = "{{LAST_YEAR}}";

/// Placeholder for the current calendar year
pub const THIS_YEAR: &str = "{{THIS_YEAR}}";

/// Placeholder for the concatenated retrieved context
pub const CONTEXT: &str = "{{CONTEXT}}";

const QUERY_PARSER_TEMPLATE: &str = include_str!("../../prompts/QueryParser.txt");
const RAG_SEARCH_TEMPLATE: &str = include_str!("../../prompts/RAGSearch.txt");

/// Identifier of a stored template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptId {
    /// Natural-language query to JSON filter fields
    QueryParser,
    /// Answer synthesis over retrieved context
    RagSearch,
}

impl PromptId {
    /// File name used when templates live on disk
    pub fn file_name(&self) -> &'static str {
        match self {
            PromptId::QueryParser => "QueryParser.txt",
            PromptId::RagSearch => "RAGSearch.txt",
        }
    }
}

impl std::fmt::Display for PromptId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Source of raw template text
pub trait PromptSource: Send + Sync {
    /// Load the raw template, failing with `TemplateNotFound` when absent
    fn load(&self, id: PromptId) -> Result<String>;
}

/// Templates compiled into the binary
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedPrompts;

impl PromptSource for EmbeddedPrompts {
    fn load(&self, id: PromptId) -> Result<String> {
        Ok(match id {
            PromptId::QueryParser => QUERY_PARSER_TEMPLATE,
            PromptId::RagSearch => RAG_SEARCH_TEMPLATE,
        }
        .to_string())
    }
}

/// Templates read from a directory on every load
#[derive(Debug, Clone)]
pub struct DirectoryPrompts {
    dir: PathBuf,
}

impl DirectoryPrompts {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl PromptSource for DirectoryPrompts {
    fn load(&self, id: PromptId) -> Result<String> {
        let path = self.dir.join(id.file_name());
        std::fs::read_to_string(&path).map_err(|e| {
            PineQueryError::TemplateNotFound(format!("{} ({})", path.display(), e))
        })
    }
}

/// Templates held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryPrompts {
    templates: HashMap<PromptId, String>,
}

impl InMemoryPrompts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: PromptId, template: impl Into<String>) -> Self {
        self.templates.insert(id, template.into());
        self
    }
}

impl PromptSource for InMemoryPrompts {
    fn load(&self, id: PromptId) -> Result<String> {
        self.templates
            .get(&id)
            .cloned()
            .ok_or_else(|| PineQueryError::TemplateNotFound(id.to_string()))
    }
}

/// Replace every literal occurrence of each placeholder, pair by pair in order
pub fn fill(template: &str, substitutions: &[(&str, &str)]) -> String {
    substitutions
        .iter()
        .fold(template.to_string(), |text, (placeholder, value)| {
            text.replace(placeholder, value)
        })
}

/// Pick the prompt source for an optional template directory
pub fn source_for(dir: Option<&std::path::Path>) -> std::sync::Arc<dyn PromptSource> {
    match dir {
        Some(dir) => std::sync::Arc::new(DirectoryPrompts::new(dir)),
        None => std::sync::Arc::new(EmbeddedPrompts),
    }
}
