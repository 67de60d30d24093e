//! Query agent
//!
//! Wires parser, filter builder, search and answer synthesis behind the three
//! public operations. An agent is built per request from an [`AgentFactory`]
//! holding the shared, stateless client handles.

use crate::clock::{Clock, SystemClock};
use crate::config::{Config, LLMServiceConfig};
use crate::error::Result;
use crate::filter::{build_filter, FilterExpression};
use crate::llm::{ProviderRegistry, QueryParser};
use crate::prompt::{self, PromptSource};
use crate::rag::RagResponder;
use crate::search::{PineconeClient, RetrievedRecord, SearchOrchestrator, VectorSearchClient};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Result of parsing a query into a filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryOutcome {
    pub filter: FilterExpression,
    pub confidence: f64,
    pub parsed_query: String,
}

/// Per-request agent bound to one language-model provider
pub struct QueryAgent {
    provider: String,
    parser: Arc<QueryParser>,
    search: Arc<SearchOrchestrator>,
    rag: RagResponder,
}

impl QueryAgent {
    /// Provider this agent talks to
    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Parse `query` into a filter without searching
    pub async fn process_query(&self, query: &str) -> Result<QueryOutcome> {
        let context = self.parser.parse(query).await?;
        let filter = build_filter(&context);

        Ok(QueryOutcome {
            filter,
            confidence: context.confidence,
            parsed_query: query.to_string(),
        })
    }

    /// Retrieve records matching `query`; an empty list means nothing matched
    pub async fn search_records(
        &self,
        query: &str,
        index_name: &str,
        namespace: &str,
    ) -> Result<Vec<RetrievedRecord>> {
        self.search
            .search_records(query, index_name, namespace)
            .await
    }

    /// Answer `query` from retrieved records; `None` means no supporting context
    pub async fn generate_answer(
        &self,
        query: &str,
        index_name: &str,
        namespace: &str,
    ) -> Result<Option<String>> {
        self.rag.answer(query, index_name, namespace).await
    }
}

/// Builds [`QueryAgent`]s from shared handles
#[derive(Clone)]
pub struct AgentFactory {
    registry: ProviderRegistry,
    llm_config: LLMServiceConfig,
    search: Arc<dyn VectorSearchClient>,
    prompts: Arc<dyn PromptSource>,
    clock: Arc<dyn Clock>,
    top_k: usize,
    normalize_tags: bool,
}

impl AgentFactory {
    pub fn new(
        registry: ProviderRegistry,
        llm_config: LLMServiceConfig,
        search: Arc<dyn VectorSearchClient>,
        prompts: Arc<dyn PromptSource>,
    ) -> Self {
        Self {
            registry,
            llm_config,
            search,
            prompts,
            clock: Arc::new(SystemClock),
            top_k: crate::search::DEFAULT_TOP_K,
            normalize_tags: false,
        }
    }

    /// Create from configuration with the default providers and Pinecone
    pub fn from_config(config: &Config) -> Result<Self> {
        let search = PineconeClient::new(config.search.clone())?;
        Ok(Self::new(
            ProviderRegistry::with_defaults(),
            config.llm.clone(),
            Arc::new(search),
            prompt::source_for(config.prompts_dir.as_deref()),
        )
        .with_top_k(config.search.top_k)
        .with_tag_normalization(config.search.normalize_tags))
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_tag_normalization(mut self, enabled: bool) -> Self {
        self.normalize_tags = enabled;
        self
    }

    /// Supported provider ids
    pub fn providers(&self) -> Vec<String> {
        self.registry.available()
    }

    /// Build an agent for `provider`; unknown providers fail before any network call
    pub fn agent(&self, provider: &str) -> Result<QueryAgent> {
        let client = self.registry.create(provider, &self.llm_config)?;

        let parser = Arc::new(
            QueryParser::new(client.clone(), self.prompts.clone()).with_clock(self.clock.clone()),
        );
        let search = Arc::new(
            SearchOrchestrator::new(parser.clone(), self.search.clone())
                .with_top_k(self.top_k)
                .with_tag_normalization(self.normalize_tags),
        );
        let rag = RagResponder::new(search.clone(), client, self.prompts.clone());

        Ok(QueryAgent {
            provider: provider.to_string(),
            parser,
            search,
            rag,
        })
    }
}
