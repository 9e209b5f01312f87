//! Error types for the mem0 SDK
//!
//! Every fallible operation in this crate returns [`Mem0Error`]. Errors carry
//! enough context (HTTP status, response body, provider name) for the caller
//! to log them without re-querying the backend.

use thiserror::Error;

/// Main error type for the mem0 SDK
#[derive(Error, Debug)]
pub enum Mem0Error {
    /// Transport-level failure talking to a remote service
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The mem0 server answered with a non-success status
    #[error("mem0 server returned {status}: {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid client or request configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A memory id did not resolve to a stored memory
    #[error("Memory not found: {0}")]
    NotFound(String),

    /// An LLM provider call failed or returned something unusable
    #[error("{provider} error: {message}")]
    Llm {
        /// Provider name ("OpenAI", "Gemini")
        provider: &'static str,
        /// Error description
        message: String,
    },
}

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, Mem0Error>;

impl Mem0Error {
    /// Create a new LLM error
    pub fn llm(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Llm {
            provider,
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether the error came from the remote side rather than from this process
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Api { .. } | Self::Llm { .. })
    }
}
