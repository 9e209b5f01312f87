use anyhow::{Context, Result};
use mem0_sdk::{
    GeminiChat, InMemoryMemoryClient, MemoryClient, OpenAiChat, RestClientConfig,
    RestMemoryClient, Scope,
};
use std::sync::Arc;
use tracing::{info, warn};

use crate::core::{
    auth::ApiKeyGate,
    categorizer::Categorizer,
    chat_agent::MemoryAgent,
    config::{MemoryBackend, Settings},
    transcript::TranscriptHandler,
};

/// Shared by every handler; cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub memory: Arc<dyn MemoryClient>,
    pub transcripts: Arc<TranscriptHandler>,
    pub categorizer: Option<Arc<Categorizer>>,
    pub chat_agent: Option<Arc<MemoryAgent>>,
    pub auth: Arc<ApiKeyGate>,
    pub search_limit: usize,
    pub default_user_id: String,
    pub default_agent_id: Option<String>,
}

impl AppState {
    pub fn new(memory: Arc<dyn MemoryClient>, settings: &Settings) -> Self {
        Self {
            memory,
            transcripts: Arc::new(TranscriptHandler::default()),
            categorizer: None,
            chat_agent: None,
            auth: Arc::new(ApiKeyGate::new(settings.auth.api_key.clone())),
            search_limit: settings.memory.search_limit,
            default_user_id: settings.memory.default_user_id.clone(),
            default_agent_id: settings.memory.default_agent_id.clone(),
        }
    }

    pub fn with_categorizer(mut self, categorizer: Categorizer) -> Self {
        self.categorizer = Some(Arc::new(categorizer));
        self
    }

    pub fn with_chat_agent(mut self, agent: MemoryAgent) -> Self {
        self.chat_agent = Some(Arc::new(agent));
        self
    }

    /// Builds the memory backend and optional LLM services described by `settings`.
    pub async fn from_settings(settings: &Settings) -> Result<Self> {
        let memory: Arc<dyn MemoryClient> = match settings.memory.backend {
            MemoryBackend::Rest => Arc::new(
                RestMemoryClient::new(RestClientConfig {
                    base_url: settings.memory.base_url.clone(),
                    api_token: settings.memory.api_token.clone(),
                    timeout: settings.memory.timeout(),
                })
                .context("Failed to create mem0 REST client")?,
            ),
            MemoryBackend::InMemory => {
                warn!("Using the in-memory backend; memories are lost on restart");
                Arc::new(InMemoryMemoryClient::new())
            },
        };
        info!("Memory backend: {}", memory.backend_name());

        if settings.memory.configure_on_start {
            memory
                .configure(&settings.mem0_config())
                .await
                .context("Failed to configure the memory store")?;
            info!("Memory store configured");
        }

        let mut state = Self::new(memory.clone(), settings);

        if settings.categorization.enabled {
            match settings.llm.openai_api_key.as_deref() {
                Some(key) if !key.is_empty() => {
                    info!(
                        "Memory categorization enabled with {}",
                        settings.llm.openai_model
                    );
                    let model = OpenAiChat::new(key, settings.llm.openai_model.clone())
                        .with_timeout(settings.llm.timeout());
                    state = state.with_categorizer(Categorizer::new(Arc::new(model)));
                },
                _ => warn!("Categorization is enabled but no OpenAI API key is set; skipping"),
            }
        }

        match settings.llm.gemini_api_key.as_deref() {
            Some(key) if !key.is_empty() => {
                let agent = MemoryAgent::new(
                    memory,
                    Arc::new(
                        GeminiChat::new(key, settings.llm.gemini_model.clone())
                            .with_timeout(settings.llm.timeout()),
                    ),
                );
                info!("Memory-enhanced chat enabled with {}", agent.model());
                state = state.with_chat_agent(agent);
            },
            _ => warn!("No Gemini API key configured; /chat will answer 503"),
        }

        Ok(state)
    }

    pub fn user_id(&self, user_id: Option<&str>) -> String {
        user_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or(&self.default_user_id)
            .to_string()
    }

    /// Request scope with blank or missing ids replaced by the configured defaults.
    pub fn scope(&self, user_id: Option<&str>, agent_id: Option<&str>) -> Scope {
        let agent_id = agent_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(String::from)
            .or_else(|| self.default_agent_id.clone());

        Scope::user(self.user_id(user_id)).with_agent(agent_id)
    }
}
