use mem0_sdk::{AddRequest, Message, Metadata, Scope};

pub const DEFAULT_TRANSCRIPT_PROMPT: &str = "Extract key insights, decisions, and action items from this meeting transcript. \
     Focus on information that would be useful to remember long-term.";

/// Turns one transcript into the two add requests the transcript endpoint issues.
pub struct TranscriptHandler {
    extraction_prompt: String,
}

impl Default for TranscriptHandler {
    fn default() -> Self {
        Self::new(DEFAULT_TRANSCRIPT_PROMPT)
    }
}

impl TranscriptHandler {
    pub fn new(extraction_prompt: impl Into<String>) -> Self {
        Self {
            extraction_prompt: extraction_prompt.into(),
        }
    }

    /// Verbatim storage: inference off, no prompt.
    pub fn store_request(
        &self,
        transcript: &[Message],
        scope: &Scope,
        metadata: &Metadata,
    ) -> AddRequest {
        AddRequest::new(transcript.to_vec(), scope.clone())
            .with_infer(false)
            .with_metadata(metadata.clone())
    }

    /// Memory extraction: inference on, caller prompt or the default one.
    pub fn extraction_request(
        &self,
        transcript: &[Message],
        scope: &Scope,
        metadata: &Metadata,
        prompt: Option<&str>,
    ) -> AddRequest {
        let prompt = prompt
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(&self.extraction_prompt);

        AddRequest::new(transcript.to_vec(), scope.clone())
            .with_infer(true)
            .with_metadata(metadata.clone())
            .with_prompt(Some(prompt.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn transcript() -> Vec<Message> {
        vec![
            Message::user("We agreed to move the launch to March."),
            Message::assistant("Noted, I'll update the roadmap."),
        ]
    }

    #[test]
    fn test_store_request_disables_inference() {
        let handler = TranscriptHandler::default();
        let mut metadata = Metadata::new();
        metadata.insert("meeting".to_string(), json!("weekly sync"));

        let request = handler.store_request(&transcript(), &Scope::user("alice"), &metadata);

        assert!(!request.infer);
        assert!(request.prompt.is_none());
        assert_eq!(request.messages, transcript());
        assert_eq!(request.metadata["meeting"], json!("weekly sync"));
        assert_eq!(request.scope.user_id.as_deref(), Some("alice"));
    }

    #[test]
    fn test_extraction_request_uses_default_prompt() {
        let handler = TranscriptHandler::default();
        let request =
            handler.extraction_request(&transcript(), &Scope::user("alice"), &Metadata::new(), None);

        assert!(request.infer);
        assert_eq!(request.prompt.as_deref(), Some(DEFAULT_TRANSCRIPT_PROMPT));
    }

    #[test]
    fn test_extraction_request_prefers_caller_prompt() {
        let handler = TranscriptHandler::default();
        let scope = Scope::user("alice");

        let custom = handler.extraction_request(
            &transcript(),
            &scope,
            &Metadata::new(),
            Some("Only keep dates"),
        );
        assert_eq!(custom.prompt.as_deref(), Some("Only keep dates"));

        let blank = handler.extraction_request(&transcript(), &scope, &Metadata::new(), Some("  "));
        assert_eq!(blank.prompt.as_deref(), Some(DEFAULT_TRANSCRIPT_PROMPT));
    }
}
