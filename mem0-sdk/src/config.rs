//! mem0 provider configuration
//!
//! The mem0 server is configured with one dictionary that selects the vector
//! store, the optional graph store, the LLM and the embedder. [`Mem0Config`]
//! is the typed form of that dictionary.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One provider entry: `{"provider": "...", "config": {...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider name understood by mem0 ("pgvector", "openai", "neo4j", ...)
    pub provider: String,
    /// Provider-specific settings
    #[serde(default)]
    pub config: Map<String, Value>,
}

impl ProviderConfig {
    /// Create an entry with an empty settings map
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            config: Map::new(),
        }
    }

    /// Add a setting; `None` values are skipped
    pub fn with(mut self, key: &str, value: impl Into<Option<Value>>) -> Self {
        if let Some(value) = value.into() {
            self.config.insert(key.to_string(), value);
        }
        self
    }
}

/// The complete mem0 configuration dictionary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mem0Config {
    /// API version of the memory format ("v1.1")
    pub version: String,
    /// Vector store selection
    pub vector_store: ProviderConfig,
    /// Optional graph store for relationship memory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph_store: Option<ProviderConfig>,
    /// LLM used for inference and extraction
    pub llm: ProviderConfig,
    /// Embedding model
    pub embedder: ProviderConfig,
}
