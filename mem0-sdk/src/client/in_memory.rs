//! In-process memory client
//!
//! Stores memories in a vector guarded by a RwLock. Data is lost when the
//! process exits. Inference is approximated: with `infer` set only user
//! messages are kept and exact duplicates inside the same scope are reported
//! as `NONE` events instead of being stored twice. Search ranks by the share
//! of query terms found in the memory text.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, info};
use uuid::Uuid;

use super::MemoryClient;
use crate::config::Mem0Config;
use crate::errors::{Mem0Error, Result};
use crate::types::{
    AddRequest, AddResult, MemoryEvent, MemoryEventKind, MemoryRecord, Metadata, Role, Scope,
    SearchRequest, SearchResult,
};

/// Memory client that keeps everything in process memory
#[derive(Default)]
pub struct InMemoryMemoryClient {
    records: RwLock<Vec<MemoryRecord>>,
}

impl InMemoryMemoryClient {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored memories
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// True when nothing is stored
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    fn new_record(content: &str, request: &AddRequest, metadata: Option<Metadata>) -> MemoryRecord {
        let now = Utc::now().to_rfc3339();
        let categories = metadata
            .as_ref()
            .and_then(|m| m.get("categories"))
            .and_then(Value::as_array)
            .map(|values| {
                values
                    .iter()
                    .filter_map(Value::as_str)
                    .map(String::from)
                    .collect()
            });

        MemoryRecord {
            id: Uuid::new_v4().to_string(),
            memory: content.to_string(),
            hash: None,
            metadata,
            categories,
            score: None,
            user_id: request.scope.user_id.clone(),
            agent_id: request.scope.agent_id.clone(),
            run_id: request.scope.run_id.clone(),
            created_at: Some(now.clone()),
            updated_at: Some(now),
        }
    }
}

fn terms(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

#[async_trait]
impl MemoryClient for InMemoryMemoryClient {
    async fn configure(&self, config: &Mem0Config) -> Result<()> {
        debug!(
            "In-memory store ignores provider configuration (vector store: {})",
            config.vector_store.provider
        );
        Ok(())
    }

    async fn add(&self, request: AddRequest) -> Result<AddResult> {
        let metadata = (!request.metadata.is_empty()).then(|| request.metadata.clone());
        let mut records = self.records.write();
        let mut events = Vec::new();

        for message in &request.messages {
            let content = message.content.trim();
            if content.is_empty() {
                continue;
            }

            if request.infer {
                if message.role != Role::User {
                    continue;
                }

                let existing = records
                    .iter()
                    .find(|r| request.scope.matches(r) && r.memory == content);
                if let Some(existing) = existing {
                    events.push(MemoryEvent {
                        id: existing.id.clone(),
                        memory: existing.memory.clone(),
                        event: MemoryEventKind::None,
                        previous_memory: None,
                    });
                    continue;
                }
            }

            let mut record_metadata = metadata.clone();
            if !request.infer {
                record_metadata
                    .get_or_insert_with(Metadata::new)
                    .insert("role".to_string(), Value::from(message.role.as_str()));
            }

            let record = Self::new_record(content, &request, record_metadata);
            events.push(MemoryEvent {
                id: record.id.clone(),
                memory: record.memory.clone(),
                event: MemoryEventKind::Add,
                previous_memory: None,
            });
            records.push(record);
        }

        debug!(
            "Stored {} of {} messages in memory",
            events
                .iter()
                .filter(|e| e.event == MemoryEventKind::Add)
                .count(),
            request.messages.len()
        );

        Ok(AddResult {
            results: events,
            relations: None,
        })
    }

    async fn search(&self, request: SearchRequest) -> Result<SearchResult> {
        let query_terms = terms(&request.query);
        if query_terms.is_empty() || request.limit == 0 {
            return Ok(SearchResult::default());
        }

        let records = self.records.read();
        let mut results: Vec<MemoryRecord> = records
            .iter()
            .filter(|r| request.scope.matches(r))
            .filter_map(|r| {
                let memory_terms = terms(&r.memory);
                let hits = query_terms
                    .iter()
                    .filter(|t| memory_terms.contains(*t))
                    .count();
                (hits > 0).then(|| MemoryRecord {
                    score: Some(hits as f64 / query_terms.len() as f64),
                    ..r.clone()
                })
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(request.limit);

        Ok(SearchResult {
            results,
            relations: None,
        })
    }

    async fn get_all(&self, scope: &Scope) -> Result<Vec<MemoryRecord>> {
        Ok(self
            .records
            .read()
            .iter()
            .filter(|r| scope.matches(r))
            .cloned()
            .collect())
    }

    async fn delete(&self, memory_id: &str) -> Result<()> {
        let mut records = self.records.write();
        let before = records.len();
        records.retain(|r| r.id != memory_id);

        if records.len() == before {
            return Err(Mem0Error::NotFound(memory_id.to_string()));
        }
        Ok(())
    }

    async fn delete_all(&self, scope: &Scope) -> Result<()> {
        if scope.is_empty() {
            return Err(Mem0Error::config(
                "delete_all needs at least one of user_id, agent_id or run_id",
            ));
        }

        let mut records = self.records.write();
        let before = records.len();
        records.retain(|r| !scope.matches(r));
        info!("Deleted {} memories", before - records.len());
        Ok(())
    }

    async fn reset(&self) -> Result<()> {
        let mut records = self.records.write();
        info!("Resetting in-memory store ({} memories)", records.len());
        records.clear();
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "in_memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Message;
    use serde_json::json;

    fn search(query: &str, user: &str, limit: usize) -> SearchRequest {
        SearchRequest {
            query: query.to_string(),
            scope: Scope::user(user),
            limit,
        }
    }

    #[tokio::test]
    async fn test_verbatim_add_keeps_every_message() {
        let client = InMemoryMemoryClient::new();
        let request = AddRequest::new(
            vec![
                Message::user("Let's ship on Friday"),
                Message::assistant("Friday it is"),
            ],
            Scope::user("alice"),
        )
        .with_infer(false);

        let result = client.add(request).await.unwrap();

        assert_eq!(result.results.len(), 2);
        let stored = client.get_all(&Scope::user("alice")).await.unwrap();
        assert_eq!(stored[1].memory, "Friday it is");
        assert_eq!(stored[1].metadata.as_ref().unwrap()["role"], json!("assistant"));
    }

    #[tokio::test]
    async fn test_inferred_add_skips_assistant_and_duplicates() {
        let client = InMemoryMemoryClient::new();
        let messages = vec![
            Message::user("I am allergic to peanuts"),
            Message::assistant("Noted"),
        ];

        let first = client
            .add(AddRequest::new(messages.clone(), Scope::user("alice")))
            .await
            .unwrap();
        let second = client
            .add(AddRequest::new(messages, Scope::user("alice")))
            .await
            .unwrap();

        assert_eq!(first.results.len(), 1);
        assert_eq!(first.results[0].event, MemoryEventKind::Add);
        assert_eq!(second.results[0].event, MemoryEventKind::None);
        assert_eq!(second.results[0].id, first.results[0].id);
        assert_eq!(client.len(), 1);
    }

    #[tokio::test]
    async fn test_categories_are_lifted_from_metadata() {
        let client = InMemoryMemoryClient::new();
        let mut metadata = Metadata::new();
        metadata.insert("categories".to_string(), json!(["health", "personal"]));

        client
            .add(
                AddRequest::new(vec![Message::user("Runs every morning")], Scope::user("bob"))
                    .with_metadata(metadata),
            )
            .await
            .unwrap();

        let stored = client.get_all(&Scope::user("bob")).await.unwrap();
        assert_eq!(
            stored[0].categories,
            Some(vec!["health".to_string(), "personal".to_string()])
        );
    }

    #[tokio::test]
    async fn test_search_ranks_and_scopes() {
        let client = InMemoryMemoryClient::new();
        for (user, text) in [
            ("alice", "Prefers green tea in the morning"),
            ("alice", "Works on the tea import project"),
            ("alice", "Owns a bicycle"),
            ("bob", "Prefers green tea too"),
        ] {
            client
                .add(AddRequest::new(vec![Message::user(text)], Scope::user(user)))
                .await
                .unwrap();
        }

        let result = client.search(search("green tea", "alice", 10)).await.unwrap();

        assert_eq!(result.results.len(), 2);
        assert_eq!(result.results[0].memory, "Prefers green tea in the morning");
        assert_eq!(result.results[0].score, Some(1.0));
        assert!(result.results.iter().all(|r| r.user_id.as_deref() == Some("alice")));

        let limited = client.search(search("green tea", "alice", 1)).await.unwrap();
        assert_eq!(limited.results.len(), 1);
    }

    #[tokio::test]
    async fn test_search_on_empty_store_is_empty() {
        let client = InMemoryMemoryClient::new();
        let result = client.search(search("anything", "alice", 5)).await.unwrap();
        assert!(result.results.is_empty());
    }

    #[tokio::test]
    async fn test_delete_and_reset() {
        let client = InMemoryMemoryClient::new();
        let added = client
            .add(AddRequest::new(vec![Message::user("Has a cat")], Scope::user("alice")))
            .await
            .unwrap();
        client
            .add(AddRequest::new(vec![Message::user("Has a dog")], Scope::user("bob")))
            .await
            .unwrap();

        client.delete(&added.results[0].id).await.unwrap();
        assert!(matches!(
            client.delete(&added.results[0].id).await,
            Err(Mem0Error::NotFound(_))
        ));

        client.delete_all(&Scope::user("bob")).await.unwrap();
        assert!(client.is_empty());

        client
            .add(AddRequest::new(vec![Message::user("Has a fish")], Scope::user("carol")))
            .await
            .unwrap();
        client.reset().await.unwrap();
        assert!(client.get_all(&Scope::user("carol")).await.unwrap().is_empty());
    }
}
