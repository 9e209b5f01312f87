//! mem0 REST server client
//!
//! Endpoints used:
//!
//! - `POST /configure` with the provider dictionary
//! - `POST /memories` to add, `GET /memories` to list
//! - `POST /search` for semantic search
//! - `DELETE /memories/{id}`, `DELETE /memories?user_id=..`, `POST /reset`
//!
//! Older servers answer list-shaped bodies (`[...]`) where newer ones wrap
//! results in `{"results": [...]}`; both are accepted.

use async_trait::async_trait;
use reqwest::{IntoUrl, Method, RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};

use super::MemoryClient;
use crate::config::Mem0Config;
use crate::errors::{Mem0Error, Result};
use crate::types::{
    AddRequest, AddResult, MemoryEvent, MemoryRecord, Scope, SearchRequest, SearchResult,
};

/// Connection settings for [`RestMemoryClient`]
#[derive(Debug, Clone)]
pub struct RestClientConfig {
    /// Server root, e.g. `http://localhost:8888`
    pub base_url: String,
    /// Bearer token sent on every request
    pub api_token: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for RestClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8888".to_string(),
            api_token: None,
            timeout: Duration::from_secs(60),
        }
    }
}

/// Memory client backed by a mem0 REST server
#[derive(Clone)]
pub struct RestMemoryClient {
    http: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AddResponse {
    Envelope(AddResult),
    Bare(Vec<MemoryEvent>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordsResponse {
    Envelope(SearchResult),
    Bare(Vec<MemoryRecord>),
}

impl From<RecordsResponse> for SearchResult {
    fn from(response: RecordsResponse) -> Self {
        match response {
            RecordsResponse::Envelope(result) => result,
            RecordsResponse::Bare(results) => SearchResult {
                results,
                relations: None,
            },
        }
    }
}

impl RestMemoryClient {
    /// Create a client; fails only if the HTTP client cannot be built
    pub fn new(config: RestClientConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(Mem0Error::config("mem0 base url is empty"));
        }

        let http = reqwest::Client::builder().timeout(config.timeout).build()?;

        info!("Using mem0 REST server at {}", base_url);

        Ok(Self {
            http,
            base_url,
            api_token: config.api_token,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.request_url(method, format!("{}{}", self.base_url, path))
    }

    fn request_url(&self, method: Method, url: impl IntoUrl) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// `/memories/{id}` with the id encoded as a single path segment
    fn memory_url(&self, memory_id: &str) -> Result<Url> {
        if matches!(memory_id, "" | "." | "..") {
            return Err(Mem0Error::config(format!("invalid memory id {memory_id:?}")));
        }

        let mut url = Url::parse(&format!("{}/memories", self.base_url))
            .map_err(|e| Mem0Error::config(format!("invalid mem0 base url: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| Mem0Error::config("mem0 base url cannot carry a path"))?
            .push(memory_id);
        Ok(url)
    }

    async fn send_checked(builder: RequestBuilder) -> Result<reqwest::Response> {
        let response = builder.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::NOT_FOUND {
            return Err(Mem0Error::NotFound(body));
        }
        Err(Mem0Error::Api {
            status: status.as_u16(),
            body,
        })
    }

    async fn send<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T> {
        let response = Self::send_checked(builder).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn send_empty(builder: RequestBuilder) -> Result<()> {
        Self::send_checked(builder).await.map(|_| ())
    }
}

#[async_trait]
impl MemoryClient for RestMemoryClient {
    async fn configure(&self, config: &Mem0Config) -> Result<()> {
        Self::send_empty(self.request(Method::POST, "/configure").json(config)).await?;
        info!(
            "Configured mem0 server (vector store: {}, llm: {})",
            config.vector_store.provider, config.llm.provider
        );
        Ok(())
    }

    async fn add(&self, request: AddRequest) -> Result<AddResult> {
        debug!(
            "Adding {} messages (infer: {})",
            request.messages.len(),
            request.infer
        );
        let response: AddResponse =
            Self::send(self.request(Method::POST, "/memories").json(&request)).await?;

        Ok(match response {
            AddResponse::Envelope(result) => result,
            AddResponse::Bare(results) => AddResult {
                results,
                relations: None,
            },
        })
    }

    async fn search(&self, request: SearchRequest) -> Result<SearchResult> {
        let response: RecordsResponse =
            Self::send(self.request(Method::POST, "/search").json(&request)).await?;
        Ok(response.into())
    }

    async fn get_all(&self, scope: &Scope) -> Result<Vec<MemoryRecord>> {
        let response: RecordsResponse = Self::send(
            self.request(Method::GET, "/memories")
                .query(&scope.query_pairs()),
        )
        .await?;
        Ok(SearchResult::from(response).results)
    }

    async fn delete(&self, memory_id: &str) -> Result<()> {
        let url = self.memory_url(memory_id)?;
        Self::send_empty(self.request_url(Method::DELETE, url)).await
    }

    async fn delete_all(&self, scope: &Scope) -> Result<()> {
        if scope.is_empty() {
            return Err(Mem0Error::config(
                "delete_all needs at least one of user_id, agent_id or run_id",
            ));
        }
        Self::send_empty(
            self.request(Method::DELETE, "/memories")
                .query(&scope.query_pairs()),
        )
        .await
    }

    async fn reset(&self) -> Result<()> {
        Self::send_empty(self.request(Method::POST, "/reset")).await
    }

    fn backend_name(&self) -> &'static str {
        "rest"
    }
}
