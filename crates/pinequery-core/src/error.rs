//! Error types for pinequery

use thiserror::Error;

/// Result type alias using PineQueryError
pub type Result<T> = std::result::Result<T, PineQueryError>;

/// Error type alias for convenience
pub type Error = PineQueryError;

/// Exit codes for CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const UNREACHABLE: i32 = 2;
    pub const INVALID_INPUT: i32 = 3;
}

/// Main error type for pinequery
#[derive(Debug, Error)]
pub enum PineQueryError {
    #[error("Prompt template not found: {0}")]
    TemplateNotFound(String),

    #[error("{provider} error: {message}")]
    LlmUnavailable { provider: String, message: String },

    /// Model output that could not be decoded. Recovered locally by the parser.
    #[error("Malformed model output: {0}")]
    MalformedModelOutput(String),

    #[error("Search index '{index}' unreachable: {message}")]
    SearchInfrastructureUnreachable { index: String, message: String },

    /// Search call failure after index resolution. Recovered locally as an empty result.
    #[error("Search query failed: {0}")]
    SearchQueryFailed(String),

    #[error("Unsupported LLM provider '{requested}'. Available providers: [{}]", .available.join(", "))]
    UnsupportedProvider {
        requested: String,
        available: Vec<String>,
    },

    #[error("Error in generating RAG response: {0}")]
    RagFailed(#[source] Box<PineQueryError>),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl PineQueryError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        if self.is_configuration() {
            return exit_codes::INVALID_INPUT;
        }
        match self {
            Self::SearchInfrastructureUnreachable { .. } => exit_codes::UNREACHABLE,
            Self::RagFailed(inner) => inner.exit_code(),
            _ => exit_codes::GENERAL_ERROR,
        }
    }

    /// Whether the error comes from setup (provider choice, keys, prompt files)
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedProvider { .. } | Self::Config(_) | Self::TemplateNotFound(_)
        )
    }

    /// Whether the caller's request itself was at fault
    ///
    /// Only an unknown provider id qualifies. Missing keys or templates are
    /// server-side faults even though they are configuration errors.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::UnsupportedProvider { .. })
    }

    pub(crate) fn llm(provider: &str, message: impl Into<String>) -> Self {
        Self::LlmUnavailable {
            provider: provider.to_string(),
            message: message.into(),
        }
    }
}
