use mem0_sdk::{AddResult, MemoryRecord, Message, Metadata, SearchResult};
use serde::{Deserialize, Serialize};

use crate::models::error::{ApiError, ApiResult};

fn default_true() -> bool {
    true
}

fn require_text(value: &str, field: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

fn require_messages(messages: &[Message], field: &str) -> ApiResult<()> {
    if messages.is_empty() {
        return Err(ApiError::Validation(format!(
            "{field} must contain at least one message"
        )));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchInput {
    pub query: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub agent_id: Option<String>,
}

impl SearchInput {
    pub fn validate(&self) -> ApiResult<()> {
        require_text(&self.query, "query")
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AddMemoryInput {
    pub messages: Vec<Message>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default = "default_true")]
    pub infer: bool,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub prompt: Option<String>,
}

impl AddMemoryInput {
    pub fn validate(&self) -> ApiResult<()> {
        require_messages(&self.messages, "messages")
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AddTranscriptInput {
    pub transcript: Vec<Message>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default = "default_true")]
    pub extract_memories: bool,
    #[serde(default)]
    pub prompt: Option<String>,
}

impl AddTranscriptInput {
    pub fn validate(&self) -> ApiResult<()> {
        require_messages(&self.transcript, "transcript")
    }
}

/// Body of `POST /get_all_memories`, also the query of `GET /get_all_memories`.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct GetAllMemoriesInput {
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DeleteMemoryInput {
    pub memory_id: String,
}

impl DeleteMemoryInput {
    pub fn validate(&self) -> ApiResult<()> {
        require_text(&self.memory_id, "memory_id")
    }
}

/// Unknown fields are rejected: a misspelt id must not widen the delete to the whole store.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct DeleteAllMemoriesInput {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub agent_id: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatInput {
    pub query: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default = "default_true")]
    pub store_conversation: bool,
    #[serde(default)]
    pub metadata: Metadata,
}

impl ChatInput {
    pub fn validate(&self) -> ApiResult<()> {
        require_text(&self.query, "query")
    }
}

/// Result of one add call as reported to the caller.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum AddOutcome {
    Added {
        status: &'static str,
        result: AddResult,
    },
    Failed {
        status: &'static str,
        message: String,
    },
}

impl AddOutcome {
    pub fn added(result: AddResult) -> Self {
        AddOutcome::Added {
            status: "memory added",
            result,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        AddOutcome::Failed {
            status: "error",
            message: message.into(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, AddOutcome::Failed { .. })
    }
}

#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub status: &'static str,
    pub storage: AddOutcome,
    pub extraction: Option<AddOutcome>,
}

impl TranscriptResponse {
    pub fn new(storage: AddOutcome, extraction: Option<AddOutcome>) -> Self {
        let total = 1 + usize::from(extraction.is_some());
        let failed = usize::from(storage.is_failed())
            + usize::from(extraction.as_ref().is_some_and(AddOutcome::is_failed));

        let status = match failed {
            0 => "transcript processed",
            n if n == total => "error",
            _ => "partial failure",
        };

        Self {
            status,
            storage,
            extraction,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SearchResponse {
    Found(SearchResult),
    Failed {
        status: &'static str,
        message: String,
        results: Vec<MemoryRecord>,
    },
}

impl SearchResponse {
    pub fn failed(message: impl Into<String>) -> Self {
        SearchResponse::Failed {
            status: "error",
            message: message.into(),
            results: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MemoryListResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub memories: Vec<MemoryRecord>,
    pub count: usize,
}

impl MemoryListResponse {
    pub fn success(memories: Vec<MemoryRecord>) -> Self {
        Self {
            status: "success",
            message: None,
            count: memories.len(),
            memories,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: Some(message.into()),
            memories: Vec::new(),
            count: 0,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StatusResponse {
    pub fn ok(status: &'static str) -> Self {
        Self {
            status,
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mem0_sdk::Role;
    use serde_json::json;

    #[test]
    fn test_add_memory_input_defaults() {
        let input: AddMemoryInput = serde_json::from_value(json!({
            "messages": [{"role": "user", "content": "Hello, world!"}]
        }))
        .unwrap();

        assert!(input.infer);
        assert!(input.metadata.is_empty());
        assert!(input.user_id.is_none());
        assert_eq!(input.messages[0].role, Role::User);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_empty_inputs_fail_validation() {
        let search: SearchInput = serde_json::from_value(json!({"query": "   "})).unwrap();
        assert!(matches!(search.validate(), Err(ApiError::Validation(_))));

        let transcript: AddTranscriptInput =
            serde_json::from_value(json!({"transcript": []})).unwrap();
        assert!(transcript.extract_memories);
        assert!(matches!(transcript.validate(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_add_outcome_shapes() {
        let added = serde_json::to_value(AddOutcome::added(AddResult::default())).unwrap();
        assert_eq!(added, json!({"status": "memory added", "result": {"results": []}}));

        let failed = serde_json::to_value(AddOutcome::failed("boom")).unwrap();
        assert_eq!(failed, json!({"status": "error", "message": "boom"}));
    }

    #[test]
    fn test_transcript_status_reflects_partial_failure() {
        let ok = TranscriptResponse::new(AddOutcome::added(AddResult::default()), None);
        assert_eq!(ok.status, "transcript processed");

        let partial = TranscriptResponse::new(
            AddOutcome::added(AddResult::default()),
            Some(AddOutcome::failed("llm down")),
        );
        assert_eq!(partial.status, "partial failure");

        let failed = TranscriptResponse::new(AddOutcome::failed("store down"), None);
        assert_eq!(failed.status, "error");
    }

    #[test]
    fn test_search_failure_shape() {
        let value = serde_json::to_value(SearchResponse::failed("timeout")).unwrap();
        assert_eq!(
            value,
            json!({"status": "error", "message": "timeout", "results": []})
        );
    }
}
