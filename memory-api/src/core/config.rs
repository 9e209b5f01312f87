use config::{Config, ConfigError, Environment, File, builder::DefaultState};
use mem0_sdk::{Mem0Config, ProviderConfig};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub mem0: Mem0ProviderConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub categorization: CategorizationConfig,
    #[serde(default)]
    pub webapp: WebAppConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AuthConfig {
    /// Shared secret expected in `X-API-Key`; unset means every guarded route answers 401.
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MemoryBackend {
    #[default]
    Rest,
    InMemory,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MemoryConfig {
    pub backend: MemoryBackend,
    pub base_url: String,
    pub api_token: Option<String>,
    pub timeout_seconds: u64,
    pub search_limit: usize,
    pub default_user_id: String,
    pub default_agent_id: Option<String>,
    /// Push the provider dictionary to the mem0 server before serving.
    pub configure_on_start: bool,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            backend: MemoryBackend::Rest,
            base_url: "http://localhost:8888".to_string(),
            api_token: None,
            timeout_seconds: 60,
            search_limit: 5,
            default_user_id: "default_user_id".to_string(),
            default_agent_id: None,
            configure_on_start: false,
        }
    }
}

impl MemoryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Provider selection forwarded to mem0 as its configuration dictionary.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Mem0ProviderConfig {
    pub version: String,
    pub collection_name: String,
    pub vector_store_provider: String,
    pub database_url: Option<String>,
    pub llm_provider: String,
    pub llm_model: String,
    pub embedder_provider: String,
    pub embedder_model: String,
    pub graph_url: Option<String>,
    pub graph_username: Option<String>,
    pub graph_password: Option<String>,
}

impl Default for Mem0ProviderConfig {
    fn default() -> Self {
        Self {
            version: "v1.1".to_string(),
            collection_name: "mem0".to_string(),
            vector_store_provider: "pgvector".to_string(),
            database_url: None,
            llm_provider: "gemini".to_string(),
            llm_model: "gemini-2.0-flash".to_string(),
            embedder_provider: "gemini".to_string(),
            embedder_model: "models/text-embedding-004".to_string(),
            graph_url: None,
            graph_username: None,
            graph_password: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LlmConfig {
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_model: "gpt-4.1-nano".to_string(),
            gemini_api_key: None,
            gemini_model: "gemini-2.0-flash".to_string(),
            timeout_seconds: 30,
        }
    }
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct CategorizationConfig {
    pub enabled: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WebAppConfig {
    pub dist_dir: PathBuf,
}

impl Default for WebAppConfig {
    fn default() -> Self {
        Self {
            dist_dir: PathBuf::from("mem0-webapp/dist"),
        }
    }
}

/// Flat variable names used by existing deployments, mapped onto settings keys.
/// Later entries win when both are present.
const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("MEMORY_API_KEY", "auth.api_key"),
    ("PORT", "server.port"),
    ("MEM0_BASE_URL", "memory.base_url"),
    ("SEARCH_LIMIT", "memory.search_limit"),
    ("DEFAULT_USER_ID", "memory.default_user_id"),
    ("DEFAULT_AGENT_ID", "memory.default_agent_id"),
    ("COLLECTION_NAME", "mem0.collection_name"),
    ("DATABASE_URL", "mem0.database_url"),
    ("LLM_PROVIDER", "mem0.llm_provider"),
    ("LLM_MODEL", "mem0.llm_model"),
    ("EMBEDDER_PROVIDER", "mem0.embedder_provider"),
    ("EMBEDDER_MODEL", "mem0.embedder_model"),
    ("NEO4J_URL", "mem0.graph_url"),
    ("NEO4J_USERNAME", "mem0.graph_username"),
    ("NEO4J_PASSWORD", "mem0.graph_password"),
    ("OPENAI_API_KEY", "llm.openai_api_key"),
    ("GEMINI_API_KEY", "llm.gemini_api_key"),
    ("GOOGLE_API_KEY", "llm.gemini_api_key"),
];

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::load(|key| env::var(key).ok())
    }

    fn load(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let run_mode = lookup("RUN_MODE").unwrap_or_else(|| "development".into());

        let builder = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::with_prefix("MEMORY_API").separator("__"));

        Self::apply_legacy_env(builder, lookup)?
            .build()?
            .try_deserialize()
    }

    fn apply_legacy_env(
        mut builder: config::ConfigBuilder<DefaultState>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<config::ConfigBuilder<DefaultState>, ConfigError> {
        for (var, key) in LEGACY_ENV_KEYS {
            if let Some(value) = lookup(var)
                && !value.trim().is_empty()
            {
                builder = builder.set_override(*key, value)?;
            }
        }

        if let Some(origins) = lookup("CORS_ORIGINS") {
            let origins: Vec<String> = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
            if !origins.is_empty() {
                builder = builder.set_override("server.cors_origins", origins)?;
            }
        }

        Ok(builder)
    }

    /// The single configuration dictionary handed to mem0.
    pub fn mem0_config(&self) -> Mem0Config {
        let m = &self.mem0;

        let graph_store = m.graph_url.as_ref().map(|url| {
            ProviderConfig::new("neo4j")
                .with("url", json!(url))
                .with("username", m.graph_username.as_ref().map(|u| json!(u)))
                .with("password", m.graph_password.as_ref().map(|p| json!(p)))
        });

        Mem0Config {
            version: m.version.clone(),
            vector_store: ProviderConfig::new(&m.vector_store_provider)
                .with("collection_name", json!(m.collection_name))
                .with("connection_string", m.database_url.as_ref().map(|u| json!(u))),
            graph_store,
            llm: ProviderConfig::new(&m.llm_provider).with("model", json!(m.llm_model)),
            embedder: ProviderConfig::new(&m.embedder_provider)
                .with("model", json!(m.embedder_model)),
        }
    }
}
