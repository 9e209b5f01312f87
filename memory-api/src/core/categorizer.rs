use mem0_sdk::{ChatModel, CompletionRequest, Message, Role};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

pub const MEMORY_CATEGORIES: [&str; 10] = [
    "general",
    "personal",
    "work",
    "education",
    "health",
    "finance",
    "ideas",
    "projects",
    "meetings",
    "important",
];

const FALLBACK_CATEGORY: &str = "general";
const MAX_CATEGORIES: usize = 3;

/// Tags memory content with up to three entries of [`MEMORY_CATEGORIES`].
pub struct Categorizer {
    model: Arc<dyn ChatModel>,
}

impl Categorizer {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    /// Never fails: any provider or parsing problem yields `["general"]`.
    pub async fn categorize(&self, content: &str) -> Vec<String> {
        let system = format!(
            "You are a helpful assistant that categorizes memories. \
             For the given memory content, return a JSON array of 1-3 most relevant categories. \
             Only use these categories: {}. \
             If no category fits, use [\"general\"].",
            MEMORY_CATEGORIES.join(", ")
        );

        let request = CompletionRequest::prompt(content)
            .with_system(system)
            .with_temperature(0.3)
            .with_max_tokens(50);

        match self.model.complete(request).await {
            Ok(raw) => parse_categories(&raw).unwrap_or_else(|| {
                warn!("Unusable categorization reply: {}", raw);
                vec![FALLBACK_CATEGORY.to_string()]
            }),
            Err(e) => {
                warn!("Error categorizing memory: {}", e);
                vec![FALLBACK_CATEGORY.to_string()]
            },
        }
    }

    /// Text that represents a message list for categorization: user turns, or everything.
    pub fn content_of(messages: &[Message]) -> String {
        let user_turns: Vec<&str> = messages
            .iter()
            .filter(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .collect();

        if user_turns.is_empty() {
            messages
                .iter()
                .map(|m| m.content.as_str())
                .collect::<Vec<_>>()
                .join("\n")
        } else {
            user_turns.join("\n")
        }
    }
}

fn parse_categories(raw: &str) -> Option<Vec<String>> {
    let trimmed = raw
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    let candidates: Vec<String> = match serde_json::from_str::<Value>(trimmed).ok()? {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(String::from)
            .collect(),
        Value::String(single) => vec![single],
        _ => return None,
    };

    let mut categories: Vec<String> = Vec::new();
    for candidate in candidates {
        let normalized = candidate.trim().to_lowercase();
        if MEMORY_CATEGORIES.contains(&normalized.as_str()) && !categories.contains(&normalized) {
            categories.push(normalized);
        }
    }
    categories.truncate(MAX_CATEGORIES);

    debug!("Parsed categories: {:?}", categories);
    (!categories.is_empty()).then_some(categories)
}
