//! Language-model provider registry
//!
//! Maps a provider identifier to a factory producing an [`LLMClient`]. Call
//! sites only ever name a provider; adding one means registering a factory.

use super::{GeminiClient, LLMClient};
use crate::config::LLMServiceConfig;
use crate::error::{PineQueryError, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Factory building a client from service configuration
pub type ProviderFactory =
    Arc<dyn Fn(&LLMServiceConfig) -> Result<Arc<dyn LLMClient>> + Send + Sync>;

/// Registry for language-model providers
#[derive(Clone)]
pub struct ProviderRegistry {
    factories: HashMap<String, ProviderFactory>,
}

impl ProviderRegistry {
    /// Create new empty registry
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Create registry with default providers
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(GeminiClient::PROVIDER, |config| {
            Ok(Arc::new(GeminiClient::new(config.clone())?) as Arc<dyn LLMClient>)
        });
        registry
    }

    /// Register a provider factory, replacing any previous one with the same id
    pub fn register<F>(&mut self, id: impl Into<String>, factory: F)
    where
        F: Fn(&LLMServiceConfig) -> Result<Arc<dyn LLMClient>> + Send + Sync + 'static,
    {
        self.factories.insert(id.into(), Arc::new(factory));
    }

    /// Register a ready-made client under an id
    pub fn register_client(&mut self, id: impl Into<String>, client: Arc<dyn LLMClient>) {
        self.register(id, move |_| Ok(client.clone()));
    }

    /// Whether a provider id is known
    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }

    /// Sorted list of registered provider ids
    pub fn available(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.factories.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Build a client for the provider id
    pub fn create(&self, id: &str, config: &LLMServiceConfig) -> Result<Arc<dyn LLMClient>> {
        let factory = self
            .factories
            .get(id)
            .ok_or_else(|| PineQueryError::UnsupportedProvider {
                requested: id.to_string(),
                available: self.available(),
            })?;
        factory(config)
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
