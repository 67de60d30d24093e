//! Filtered top-K retrieval for a natural-language query
//!
//! Failures before the search call (index resolution, query parsing) are
//! returned to the caller. Failures of the search call itself are logged and
//! reported as an empty result.

use super::{RetrievedRecord, VectorSearchClient};
use crate::error::{PineQueryError, Result};
use crate::filter::{build_filter, FilterExpression};
use crate::llm::QueryParser;
use std::sync::Arc;

/// Default number of records requested per search
pub const DEFAULT_TOP_K: usize = 5;

/// Resolves an index, parses the query into a filter and runs the search
pub struct SearchOrchestrator {
    parser: Arc<QueryParser>,
    client: Arc<dyn VectorSearchClient>,
    top_k: usize,
    normalize_tags: bool,
}

impl SearchOrchestrator {
    pub fn new(parser: Arc<QueryParser>, client: Arc<dyn VectorSearchClient>) -> Self {
        Self {
            parser,
            client,
            top_k: DEFAULT_TOP_K,
            normalize_tags: false,
        }
    }

    /// Set the number of records requested
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Normalize `tags` filter values before searching
    pub fn with_tag_normalization(mut self, enabled: bool) -> Self {
        self.normalize_tags = enabled;
        self
    }

    /// Filter that will accompany the search for `query`
    pub async fn filter_for(&self, query: &str) -> Result<FilterExpression> {
        let context = self.parser.parse(query).await?;
        let mut filter = build_filter(&context);
        if self.normalize_tags {
            filter.normalize_tags();
        }
        Ok(filter)
    }

    /// Search records matching `query` in `index_name` / `namespace`
    pub async fn search_records(
        &self,
        query: &str,
        index_name: &str,
        namespace: &str,
    ) -> Result<Vec<RetrievedRecord>> {
        let index = self
            .client
            .describe_index(index_name)
            .await
            .map_err(|e| match e {
                e @ PineQueryError::SearchInfrastructureUnreachable { .. } => e,
                other => PineQueryError::SearchInfrastructureUnreachable {
                    index: index_name.to_string(),
                    message: other.to_string(),
                },
            })?;

        let filter = self.filter_for(query).await?;

        tracing::debug!(
            index = index_name,
            namespace,
            filter = %filter.to_value(),
            top_k = self.top_k,
            "searching records"
        );

        match self
            .client
            .search(&index, namespace, query, &filter, self.top_k)
            .await
        {
            Ok(records) => {
                tracing::info!(index = index_name, namespace, records = records.len(), "search complete");
                Ok(records)
            }
            Err(e) => {
                tracing::warn!(
                    index = index_name,
                    namespace,
                    error = %e,
                    "error retrieving records, returning no results"
                );
                Ok(Vec::new())
            }
        }
    }
}
