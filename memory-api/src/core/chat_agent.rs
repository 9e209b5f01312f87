use mem0_sdk::{
    AddRequest, ChatModel, CompletionRequest, MemoryClient, MemoryRecord, Message, Metadata,
    Result as SdkResult, Scope, SearchRequest,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

const AGENT_INSTRUCTIONS: &str = "You are a memory-enhanced AI assistant. \
     When responding, consider the provided memory context to give more informed and personalized responses. \
     If the memory context is relevant, incorporate it naturally into your response. \
     Be helpful, accurate, and conversational.";

const CONTEXT_LIMIT: usize = 5;

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub response: String,
    pub memories_used: usize,
    pub memory_context: Option<String>,
}

/// Answers a query with the caller's most relevant memories as context.
pub struct MemoryAgent {
    memory: Arc<dyn MemoryClient>,
    model: Arc<dyn ChatModel>,
    context_limit: usize,
}

impl MemoryAgent {
    pub fn new(memory: Arc<dyn MemoryClient>, model: Arc<dyn ChatModel>) -> Self {
        Self {
            memory,
            model,
            context_limit: CONTEXT_LIMIT,
        }
    }

    pub fn model(&self) -> &str {
        self.model.model()
    }

    pub async fn chat_with_memory(
        &self,
        query: &str,
        scope: &Scope,
        store_conversation: bool,
        metadata: Metadata,
    ) -> SdkResult<ChatReply> {
        info!(
            "Processing chat query for user: {:?}, agent: {:?}",
            scope.user_id, scope.agent_id
        );

        let found = self
            .memory
            .search(SearchRequest {
                query: query.to_string(),
                scope: scope.clone(),
                limit: self.context_limit,
            })
            .await?;
        info!("Found {} relevant memories", found.results.len());

        let memory_context = format_memory_context(&found.results);
        let request = CompletionRequest::prompt(build_enhanced_prompt(query, &memory_context))
            .with_system(AGENT_INSTRUCTIONS);
        let response = self.model.complete(request).await?;

        if store_conversation {
            self.store_conversation(query, &response, scope, metadata)
                .await;
        }

        Ok(ChatReply {
            response,
            memories_used: found.results.len(),
            memory_context: (!memory_context.is_empty()).then_some(memory_context),
        })
    }

    async fn store_conversation(
        &self,
        query: &str,
        response: &str,
        scope: &Scope,
        metadata: Metadata,
    ) {
        let mut conversation_metadata = Metadata::new();
        conversation_metadata.insert("type".to_string(), Value::from("conversation"));
        conversation_metadata.insert("source".to_string(), Value::from("memory_agent"));
        conversation_metadata.extend(metadata);

        let request = AddRequest::new(
            vec![Message::user(query), Message::assistant(response)],
            scope.clone(),
        )
        .with_metadata(conversation_metadata);

        match self.memory.add(request).await {
            Ok(_) => info!("Stored conversation in memory for user: {:?}", scope.user_id),
            Err(e) => warn!("Could not store conversation in memory: {}", e),
        }
    }
}

fn format_memory_context(memories: &[MemoryRecord]) -> String {
    memories
        .iter()
        .map(|m| m.memory.trim())
        .filter(|text| !text.is_empty())
        .enumerate()
        .map(|(i, text)| format!("{}. {}", i + 1, text))
        .collect::<Vec<_>>()
        .join("\n")
}

fn build_enhanced_prompt(query: &str, memory_context: &str) -> String {
    if memory_context.is_empty() {
        format!("User query: {query}\n\nPlease provide a helpful response to the user's query.")
    } else {
        format!(
            "Relevant memories from previous conversations:\n{memory_context}\n\n\
             Current user query: {query}\n\n\
             Please provide a helpful response considering both the current query \
             and any relevant context from the memories above."
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mem0_sdk::{InMemoryMemoryClient, Mem0Error};
    use std::sync::Mutex;

    struct EchoModel {
        prompts: Mutex<Vec<CompletionRequest>>,
        fail: bool,
    }

    impl EchoModel {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                prompts: Mutex::new(Vec::new()),
                fail,
            })
        }
    }

    #[async_trait]
    impl ChatModel for EchoModel {
        async fn complete(&self, request: CompletionRequest) -> SdkResult<String> {
            self.prompts.lock().unwrap().push(request);
            if self.fail {
                return Err(Mem0Error::llm("Gemini", "model overloaded"));
            }
            Ok("Your flight leaves on Friday.".to_string())
        }

        fn model(&self) -> &str {
            "echo"
        }
    }

    async fn seeded_memory() -> Arc<InMemoryMemoryClient> {
        let memory = Arc::new(InMemoryMemoryClient::new());
        memory
            .add(
                AddRequest::new(
                    vec![Message::user("My flight to Lisbon leaves on Friday")],
                    Scope::user("alice"),
                )
                .with_infer(false),
            )
            .await
            .unwrap();
        memory
    }

    #[test]
    fn test_format_memory_context_numbers_entries() {
        let record = |text: &str| MemoryRecord {
            id: text.to_string(),
            memory: text.to_string(),
            hash: None,
            metadata: None,
            categories: None,
            score: None,
            user_id: None,
            agent_id: None,
            run_id: None,
            created_at: None,
            updated_at: None,
        };

        let context = format_memory_context(&[record("Likes tea"), record("Lives in Porto")]);
        assert_eq!(context, "1. Likes tea\n2. Lives in Porto");
        assert_eq!(format_memory_context(&[]), "");

        let with_blank =
            format_memory_context(&[record(""), record("Likes tea"), record("  ")]);
        assert_eq!(with_blank, "1. Likes tea");
        assert_eq!(format_memory_context(&[record(""), record(" ")]), "");
    }

    #[test]
    fn test_enhanced_prompt_variants() {
        let with_context = build_enhanced_prompt("When do I fly?", "1. Flight on Friday");
        assert!(with_context.contains("Relevant memories from previous conversations:"));
        assert!(with_context.contains("1. Flight on Friday"));
        assert!(with_context.contains("Current user query: When do I fly?"));

        let bare = build_enhanced_prompt("When do I fly?", "");
        assert!(bare.starts_with("User query: When do I fly?"));
        assert!(!bare.contains("Relevant memories"));
    }

    #[tokio::test]
    async fn test_chat_uses_memories_and_stores_exchange() {
        let memory = seeded_memory().await;
        let model = EchoModel::new(false);
        let agent = MemoryAgent::new(memory.clone(), model.clone());

        let mut metadata = Metadata::new();
        metadata.insert("channel".to_string(), Value::from("web"));

        let reply = agent
            .chat_with_memory("When does my flight leave?", &Scope::user("alice"), true, metadata)
            .await
            .unwrap();

        assert_eq!(reply.response, "Your flight leaves on Friday.");
        assert_eq!(reply.memories_used, 1);
        assert_eq!(
            reply.memory_context.as_deref(),
            Some("1. My flight to Lisbon leaves on Friday")
        );

        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts[0].system.as_deref(), Some(AGENT_INSTRUCTIONS));
        assert!(prompts[0].messages[0].content.contains("Lisbon"));
        drop(prompts);

        let stored = memory.get_all(&Scope::user("alice")).await.unwrap();
        let conversation = stored
            .iter()
            .find(|m| m.memory == "When does my flight leave?")
            .expect("conversation stored");
        let stored_metadata = conversation.metadata.as_ref().unwrap();
        assert_eq!(stored_metadata["type"], "conversation");
        assert_eq!(stored_metadata["source"], "memory_agent");
        assert_eq!(stored_metadata["channel"], "web");
    }

    #[tokio::test]
    async fn test_chat_without_memories_or_storage() {
        let memory = Arc::new(InMemoryMemoryClient::new());
        let agent = MemoryAgent::new(memory.clone(), EchoModel::new(false));

        let reply = agent
            .chat_with_memory("Hello", &Scope::user("bob"), false, Metadata::new())
            .await
            .unwrap();

        assert_eq!(reply.memories_used, 0);
        assert!(reply.memory_context.is_none());
        assert!(memory.is_empty());
    }

    #[tokio::test]
    async fn test_model_failure_propagates() {
        let memory = seeded_memory().await;
        let agent = MemoryAgent::new(memory.clone(), EchoModel::new(true));

        let err = agent
            .chat_with_memory("When?", &Scope::user("alice"), true, Metadata::new())
            .await
            .unwrap_err();

        assert!(err.is_upstream());
        assert_eq!(memory.len(), 1);
    }
}
