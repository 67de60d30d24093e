//! PineQuery Core Library
//!
//! Turns natural-language queries into vector-search metadata filters, retrieves
//! matching records and synthesizes answers from them.
//!
//! # Features
//! - LLM-backed query parsing with lenient JSON decoding
//! - Deterministic filter construction (`$eq` / `$in` predicates)
//! - Filtered top-K retrieval from Pinecone
//! - Retrieval-augmented answer generation
//! - Pluggable language-model providers and prompt sources

pub mod agent;
pub mod clock;
pub mod config;
pub mod error;
pub mod filter;
pub mod llm;
pub mod prompt;
pub mod rag;
pub mod search;

pub use agent::{AgentFactory, QueryAgent, QueryOutcome};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{Config, LLMServiceConfig, SearchServiceConfig, ServerConfig};
pub use error::{Error, PineQueryError, Result};
pub use filter::{build_filter, FilterExpression};
pub use llm::{
    DateInfo, GeminiClient, LLMClient, ParsedQueryContext, ProviderRegistry, QueryParser,
};
pub use prompt::{DirectoryPrompts, EmbeddedPrompts, InMemoryPrompts, PromptId, PromptSource};
pub use rag::RagResponder;
pub use search::{
    IndexHandle, PineconeClient, RetrievedRecord, SearchOrchestrator, VectorSearchClient,
};

/// Default config directory name
pub const CONFIG_DIR_NAME: &str = "pinequery";
