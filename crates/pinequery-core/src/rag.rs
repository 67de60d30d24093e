//! Retrieval-augmented answers
//!
//! Any failure on this path is fatal to the request and surfaces as
//! [`PineQueryError::RagFailed`]. An empty retrieval is not a failure: it
//! yields no answer and skips the second model call.

use crate::error::{PineQueryError, Result};
use crate::llm::LLMClient;
use crate::prompt::{self, PromptId, PromptSource};
use crate::search::{RetrievedRecord, SearchOrchestrator};
use std::sync::Arc;

/// Separator placed between record texts in the context block
pub const CONTEXT_SEPARATOR: &str = "\n";

/// Produces free-text answers grounded in retrieved records
pub struct RagResponder {
    search: Arc<SearchOrchestrator>,
    client: Arc<dyn LLMClient>,
    prompts: Arc<dyn PromptSource>,
}

impl RagResponder {
    pub fn new(
        search: Arc<SearchOrchestrator>,
        client: Arc<dyn LLMClient>,
        prompts: Arc<dyn PromptSource>,
    ) -> Self {
        Self {
            search,
            client,
            prompts,
        }
    }

    /// Answer `query` from records in `index_name` / `namespace`
    ///
    /// Returns `Ok(None)` when the search finds nothing.
    pub async fn answer(
        &self,
        query: &str,
        index_name: &str,
        namespace: &str,
    ) -> Result<Option<String>> {
        self.try_answer(query, index_name, namespace)
            .await
            .map_err(|e| PineQueryError::RagFailed(Box::new(e)))
    }

    async fn try_answer(
        &self,
        query: &str,
        index_name: &str,
        namespace: &str,
    ) -> Result<Option<String>> {
        let records = self
            .search
            .search_records(query, index_name, namespace)
            .await?;

        if records.is_empty() {
            tracing::info!(index = index_name, namespace, "no supporting records, no answer");
            return Ok(None);
        }

        let template = self.prompts.load(PromptId::RagSearch)?;
        let context = combine_context(&records)?;
        let prompt = prompt::fill(
            &template,
            &[(prompt::CONTEXT, context.as_str()), (prompt::QUERY, query)],
        );

        let answer = self.client.generate(&prompt, false).await?;
        Ok(Some(answer))
    }
}

/// Join record texts in retrieval order
pub fn combine_context(records: &[RetrievedRecord]) -> Result<String> {
    let texts = records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            record.text().ok_or_else(|| {
                PineQueryError::InvalidRecord(format!("record {} has no string 'text' field", i))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(texts.join(CONTEXT_SEPARATOR))
}
