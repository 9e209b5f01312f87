//! Memory client abstraction
//!
//! [`MemoryClient`] is the seam between the HTTP gateway and the memory
//! store. Two implementations ship with the crate:
//!
//! - [`RestMemoryClient`]: talks to a mem0 REST server
//! - [`InMemoryMemoryClient`]: process-local store for development and tests

use async_trait::async_trait;

use crate::config::Mem0Config;
use crate::errors::Result;
use crate::types::{AddRequest, AddResult, MemoryRecord, Scope, SearchRequest, SearchResult};

mod in_memory;
mod rest;

pub use in_memory::InMemoryMemoryClient;
pub use rest::{RestClientConfig, RestMemoryClient};

/// Operations the gateway forwards to the memory store
///
/// Implementations must be thread-safe (Send + Sync) as a single instance is
/// shared by every request handler.
#[async_trait]
pub trait MemoryClient: Send + Sync {
    /// Apply a provider configuration to the store
    async fn configure(&self, config: &Mem0Config) -> Result<()>;

    /// Store memories derived from the request messages
    async fn add(&self, request: AddRequest) -> Result<AddResult>;

    /// Semantic search within a scope
    async fn search(&self, request: SearchRequest) -> Result<SearchResult>;

    /// List every memory in a scope
    async fn get_all(&self, scope: &Scope) -> Result<Vec<MemoryRecord>>;

    /// Delete one memory by id
    async fn delete(&self, memory_id: &str) -> Result<()>;

    /// Delete every memory in a non-empty scope
    async fn delete_all(&self, scope: &Scope) -> Result<()>;

    /// Irreversibly delete every memory in the store
    async fn reset(&self) -> Result<()>;

    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;
}
