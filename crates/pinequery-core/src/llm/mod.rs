//! LLM integration
//!
//! Provides the language-model client trait and implementations for:
//! - Text and JSON generation via external services (Gemini)
//! - Provider selection by identifier
//! - Query parsing

mod client;
mod query_parser;
mod registry;

pub use client::{GeminiClient, LLMClient};
pub use query_parser::{decode_response, DateInfo, ParsedQueryContext, QueryParser};
pub use registry::{ProviderFactory, ProviderRegistry};
