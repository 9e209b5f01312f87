//! # mem0 SDK for Rust
//!
//! Typed access to a [mem0](https://github.com/mem0ai/mem0) memory store and
//! the two LLM providers the memory gateway talks to.
//!
//! ## Features
//!
//! - **Memory client trait**: one [`MemoryClient`] seam for add, search,
//!   listing and deletion
//! - **REST backend**: [`RestMemoryClient`] for a running mem0 server
//! - **In-memory backend**: [`InMemoryMemoryClient`] for development and tests
//! - **Provider configuration**: [`Mem0Config`], the dictionary mem0 is
//!   configured with
//! - **LLM clients**: [`OpenAiChat`] and [`GeminiChat`] behind [`ChatModel`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mem0_sdk::{AddRequest, InMemoryMemoryClient, MemoryClient, Message, Scope, SearchRequest};
//!
//! #[tokio::main]
//! async fn main() -> mem0_sdk::Result<()> {
//!     let client = InMemoryMemoryClient::new();
//!     client
//!         .add(AddRequest::new(vec![Message::user("I prefer tea")], Scope::user("alice")))
//!         .await?;
//!
//!     let found = client
//!         .search(SearchRequest {
//!             query: "tea".to_string(),
//!             scope: Scope::user("alice"),
//!             limit: 5,
//!         })
//!         .await?;
//!     println!("{} memories", found.results.len());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

/// Memory store clients
pub mod client;
/// mem0 provider configuration
pub mod config;
mod errors;
/// LLM chat clients
pub mod llm;
mod types;

pub use client::{InMemoryMemoryClient, MemoryClient, RestClientConfig, RestMemoryClient};
pub use config::{Mem0Config, ProviderConfig};
pub use errors::{Mem0Error, Result};
pub use llm::{ChatModel, CompletionRequest, GeminiChat, OpenAiChat};
pub use types::{
    AddRequest, AddResult, MemoryEvent, MemoryEventKind, MemoryRecord, Message, Metadata, Role,
    Scope, SearchRequest, SearchResult,
};
