//! Configuration management

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Language-model service configuration
    #[serde(default)]
    pub llm: LLMServiceConfig,

    /// Vector-search service configuration
    #[serde(default)]
    pub search: SearchServiceConfig,

    /// Directory holding prompt templates (built-in templates when unset)
    #[serde(default = "default_prompts_dir")]
    pub prompts_dir: Option<PathBuf>,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
}

/// Language-model service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMServiceConfig {
    /// Base URL of the generative language API
    #[serde(default = "default_llm_url")]
    pub url: String,

    /// Model used for both query parsing and answer generation
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// API key
    #[serde(default = "default_llm_api_key")]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Sampling temperature (provider default when unset)
    #[serde(default)]
    pub temperature: Option<f32>,
}

impl Default for LLMServiceConfig {
    fn default() -> Self {
        Self {
            url: default_llm_url(),
            model: default_llm_model(),
            api_key: default_llm_api_key(),
            timeout_secs: default_timeout(),
            temperature: None,
        }
    }
}

/// Vector-search service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchServiceConfig {
    /// Control-plane URL used to resolve index hosts
    #[serde(default = "default_control_url")]
    pub control_url: String,

    /// API key
    #[serde(default = "default_search_api_key")]
    pub api_key: Option<String>,

    /// API version header value
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Number of records requested per search
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Lowercase and de-space `tags` filter values before searching
    #[serde(default)]
    pub normalize_tags: bool,

    /// Index used by the CLI when none is given
    #[serde(default = "default_index")]
    pub default_index: Option<String>,

    /// Namespace used by the CLI when none is given
    #[serde(default = "default_namespace")]
    pub default_namespace: Option<String>,
}

impl Default for SearchServiceConfig {
    fn default() -> Self {
        Self {
            control_url: default_control_url(),
            api_key: default_search_api_key(),
            api_version: default_api_version(),
            top_k: default_top_k(),
            timeout_secs: default_timeout(),
            normalize_tags: false,
            default_index: default_index(),
            default_namespace: default_namespace(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to bind
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_llm_url() -> String {
    std::env::var("PINEQUERY_LLM_URL")
        .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string())
}

fn default_llm_model() -> String {
    std::env::var("PINEQUERY_LLM_MODEL").unwrap_or_else(|_| "gemini-2.5-flash".to_string())
}

fn default_llm_api_key() -> Option<String> {
    std::env::var("GEMINI_API_KEY")
        .or_else(|_| std::env::var("GOOGLE_API_KEY"))
        .ok()
}

fn default_control_url() -> String {
    std::env::var("PINECONE_CONTROL_URL").unwrap_or_else(|_| "https://api.pinecone.io".to_string())
}

fn default_search_api_key() -> Option<String> {
    std::env::var("PINECONE_API_KEY").ok()
}

fn default_api_version() -> String {
    "2025-04".to_string()
}

fn default_top_k() -> usize {
    5
}

fn default_timeout() -> u64 {
    30
}

fn default_index() -> Option<String> {
    std::env::var("PINECONE_INDEX_NAME").ok()
}

fn default_namespace() -> Option<String> {
    std::env::var("PINECONE_NAMESPACE").ok()
}

fn default_prompts_dir() -> Option<PathBuf> {
    std::env::var("PINEQUERY_PROMPTS_DIR").ok().map(PathBuf::from)
}

fn default_bind() -> String {
    std::env::var("PINEQUERY_BIND").unwrap_or_else(|_| "0.0.0.0:8000".to_string())
}

impl Config {
    /// Load config from `PINEQUERY_CONFIG` or the default path
    pub fn load() -> Result<Self> {
        let path = std::env::var("PINEQUERY_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::default_path());
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Config {
                prompts_dir: default_prompts_dir(),
                ..Config::default()
            })
        }
    }

    /// Load config from a YAML file
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CONFIG_DIR_NAME)
            .join("config.yml")
    }
}
