//! Minimal LLM chat clients
//!
//! The gateway needs one-shot completions only: categorising a memory and
//! answering a query with memory context. [`ChatModel`] hides the provider.

use async_trait::async_trait;
use std::time::Duration;

use crate::errors::Result;
use crate::types::Message;

mod gemini;
mod openai;

pub use gemini::GeminiChat;
pub use openai::OpenAiChat;

/// Per-request timeout applied by the chat clients unless overridden
pub const DEFAULT_LLM_TIMEOUT: Duration = Duration::from_secs(30);

/// A single completion request
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System instruction
    pub system: Option<String>,
    /// Conversation so far; system-role entries are folded into `system`
    pub messages: Vec<Message>,
    /// Sampling temperature
    pub temperature: f32,
    /// Output token ceiling
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    /// Single user prompt with default sampling
    pub fn prompt(text: impl Into<String>) -> Self {
        Self {
            system: None,
            messages: vec![Message::user(text)],
            temperature: 0.7,
            max_tokens: None,
        }
    }

    /// Set the system instruction
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the output token ceiling
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// A chat completion provider
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Return the model's text reply
    async fn complete(&self, request: CompletionRequest) -> Result<String>;

    /// Model identifier
    fn model(&self) -> &str;
}
