//! Type definitions for the mem0 data model
//!
//! These mirror the JSON shapes used by the mem0 REST server so that results
//! can be passed through to callers unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form metadata attached to a memory
pub type Metadata = Map<String, Value>;

/// Author of a conversation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// End user
    User,
    /// Model or agent reply
    Assistant,
    /// System instruction
    System,
}

impl Role {
    /// Wire name of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

/// A single role/content pair fed to an add operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who said it
    pub role: Role,
    /// What was said
    pub content: String,
}

impl Message {
    /// Create a message with an explicit role
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }
}

/// Ownership scope of a memory operation
///
/// Every field that is set narrows the operation; an empty scope matches
/// everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    /// Owning user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Owning agent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    /// Owning run/session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
}

impl Scope {
    /// Scope limited to one user
    pub fn user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Default::default()
        }
    }

    /// Narrow the scope to an agent
    pub fn with_agent(mut self, agent_id: Option<String>) -> Self {
        self.agent_id = agent_id;
        self
    }

    /// True when no identifier is set
    pub fn is_empty(&self) -> bool {
        self.user_id.is_none() && self.agent_id.is_none() && self.run_id.is_none()
    }

    /// Whether a stored record falls inside this scope
    pub fn matches(&self, record: &MemoryRecord) -> bool {
        fn field_matches(wanted: &Option<String>, actual: &Option<String>) -> bool {
            match wanted {
                Some(wanted) => actual.as_deref() == Some(wanted.as_str()),
                None => true,
            }
        }

        field_matches(&self.user_id, &record.user_id)
            && field_matches(&self.agent_id, &record.agent_id)
            && field_matches(&self.run_id, &record.run_id)
    }

    /// Identifiers as query-string pairs
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::new();
        if let Some(user_id) = &self.user_id {
            pairs.push(("user_id", user_id.as_str()));
        }
        if let Some(agent_id) = &self.agent_id {
            pairs.push(("agent_id", agent_id.as_str()));
        }
        if let Some(run_id) = &self.run_id {
            pairs.push(("run_id", run_id.as_str()));
        }
        pairs
    }
}

/// A request to store memories derived from messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddRequest {
    /// Input conversation
    pub messages: Vec<Message>,
    /// Who the memories belong to
    #[serde(flatten)]
    pub scope: Scope,
    /// Let the memory store decide what to keep (`true`) or store verbatim (`false`)
    pub infer: bool,
    /// Metadata copied onto every resulting memory
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Metadata,
    /// Guidance for the inference step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

impl AddRequest {
    /// Create an inferring add request with no metadata
    pub fn new(messages: Vec<Message>, scope: Scope) -> Self {
        Self {
            messages,
            scope,
            infer: true,
            metadata: Metadata::new(),
            prompt: None,
        }
    }

    /// Set the inference flag
    pub fn with_infer(mut self, infer: bool) -> Self {
        self.infer = infer;
        self
    }

    /// Replace the metadata
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Set the inference prompt
    pub fn with_prompt(mut self, prompt: Option<String>) -> Self {
        self.prompt = prompt;
        self
    }
}

/// A semantic search request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Natural-language query
    pub query: String,
    /// Where to search
    #[serde(flatten)]
    pub scope: Scope,
    /// Maximum number of results
    pub limit: usize,
}

/// A stored memory as returned by listing and search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// Memory identifier
    pub id: String,
    /// Memory text
    pub memory: String,
    /// Content hash computed by the store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    /// Caller metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// Category tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    /// Similarity score (search results only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Owning user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Owning agent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    /// Owning run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    /// ISO 8601 creation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// ISO 8601 last update time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// What an add operation did to a memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MemoryEventKind {
    /// New memory stored
    Add,
    /// Existing memory rewritten
    Update,
    /// Existing memory removed
    Delete,
    /// Input already known, nothing changed
    None,
}

/// One entry of an add result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryEvent {
    /// Affected memory id
    pub id: String,
    /// Memory text after the event
    pub memory: String,
    /// Event kind
    pub event: MemoryEventKind,
    /// Text before an update
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_memory: Option<String>,
}

/// Result of an add operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddResult {
    /// Per-memory events
    pub results: Vec<MemoryEvent>,
    /// Graph relations touched, when a graph store is configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relations: Option<Value>,
}

/// Result of a search operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Matching memories, best first
    pub results: Vec<MemoryRecord>,
    /// Related graph entities, when a graph store is configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relations: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(user: &str, agent: Option<&str>) -> MemoryRecord {
        MemoryRecord {
            id: "m1".to_string(),
            memory: "likes tea".to_string(),
            hash: None,
            metadata: None,
            categories: None,
            score: None,
            user_id: Some(user.to_string()),
            agent_id: agent.map(String::from),
            run_id: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_scope_matching() {
        let alice = record("alice", Some("planner"));

        assert!(Scope::default().matches(&alice));
        assert!(Scope::user("alice").matches(&alice));
        assert!(
            Scope::user("alice")
                .with_agent(Some("planner".to_string()))
                .matches(&alice)
        );
        assert!(
            !Scope::user("alice")
                .with_agent(Some("writer".to_string()))
                .matches(&alice)
        );
        assert!(!Scope::user("bob").matches(&alice));
        assert!(
            !Scope::user("alice")
                .with_agent(Some("planner".to_string()))
                .matches(&record("alice", None))
        );
    }

    #[test]
    fn test_add_request_flattens_scope() {
        let request = AddRequest::new(
            vec![Message::user("I moved to Lisbon")],
            Scope::user("alice"),
        )
        .with_infer(false);

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "messages": [{"role": "user", "content": "I moved to Lisbon"}],
                "user_id": "alice",
                "infer": false
            })
        );
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let parsed = serde_json::from_value::<Message>(json!({"role": "tool", "content": "x"}));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_event_kind_wire_names() {
        let event: MemoryEvent = serde_json::from_value(json!({
            "id": "abc",
            "memory": "Prefers window seats",
            "event": "UPDATE",
            "previous_memory": "Prefers aisle seats"
        }))
        .unwrap();
        assert_eq!(event.event, MemoryEventKind::Update);
        assert_eq!(event.previous_memory.as_deref(), Some("Prefers aisle seats"));
    }

    #[test]
    fn test_query_pairs_skip_missing_ids() {
        let scope = Scope::user("alice").with_agent(Some("planner".to_string()));
        assert_eq!(
            scope.query_pairs(),
            vec![("user_id", "alice"), ("agent_id", "planner")]
        );
        assert!(Scope::default().query_pairs().is_empty());
    }
}
