//! Gemini `generateContent` client

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{ChatModel, CompletionRequest, DEFAULT_LLM_TIMEOUT};
use crate::errors::{Mem0Error, Result};
use crate::types::Role;

const PROVIDER: &str = "Gemini";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Client for `POST {base}/models/{model}:generateContent`
#[derive(Clone)]
pub struct GeminiChat {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl GeminiChat {
    /// Create a client for the public Gemini API
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_LLM_TIMEOUT,
        }
    }

    /// Point the client at another endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Give up on a request after `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn model_path(&self) -> String {
        if self.model.starts_with("models/") {
            self.model.clone()
        } else {
            format!("models/{}", self.model)
        }
    }
}

#[async_trait]
impl ChatModel for GeminiChat {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        let mut system_parts: Vec<Part<'_>> = request
            .system
            .as_deref()
            .map(|text| vec![Part { text }])
            .unwrap_or_default();

        let mut contents = Vec::with_capacity(request.messages.len());
        for message in &request.messages {
            let role = match message.role {
                Role::System => {
                    system_parts.push(Part {
                        text: &message.content,
                    });
                    continue;
                },
                Role::User => "user",
                Role::Assistant => "model",
            };
            contents.push(Content {
                role: Some(role),
                parts: vec![Part {
                    text: &message.content,
                }],
            });
        }

        let body = GenerateContentRequest {
            system_instruction: (!system_parts.is_empty()).then(|| Content {
                role: None,
                parts: system_parts,
            }),
            contents,
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
            },
        };

        let url = format!("{}/{}:generateContent", self.base_url, self.model_path());
        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(Mem0Error::llm(PROVIDER, format!("{status}: {error_text}")));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        if let Some(err) = parsed.error {
            return Err(Mem0Error::llm(PROVIDER, err.message));
        }

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(Mem0Error::llm(PROVIDER, "response had no text"));
        }

        debug!("{} returned {} chars", self.model, text.len());
        Ok(text)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Message;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_complete_maps_roles_and_joins_parts() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/gemini-2.0-flash:generateContent"))
            .and(header("x-goog-api-key", "g-key"))
            .and(body_partial_json(json!({
                "systemInstruction": {"parts": [{"text": "Be brief"}, {"text": "Use memories"}]},
                "contents": [
                    {"role": "user", "parts": [{"text": "Hi"}]},
                    {"role": "model", "parts": [{"text": "Hello"}]}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{"text": "Good "}, {"text": "morning"}]}}]
            })))
            .mount(&server)
            .await;

        let client = GeminiChat::new("g-key", "gemini-2.0-flash").with_base_url(server.uri());
        let request = CompletionRequest {
            system: Some("Be brief".to_string()),
            messages: vec![
                Message::system("Use memories"),
                Message::user("Hi"),
                Message::assistant("Hello"),
            ],
            temperature: 0.2,
            max_tokens: None,
        };

        assert_eq!(client.complete(request).await.unwrap(), "Good morning");
    }

    #[tokio::test]
    async fn test_empty_candidates_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/gemini-2.0-flash:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
            .mount(&server)
            .await;

        let client =
            GeminiChat::new("g-key", "models/gemini-2.0-flash").with_base_url(server.uri());
        let err = client
            .complete(CompletionRequest::prompt("Hi"))
            .await
            .unwrap_err();

        assert!(matches!(err, Mem0Error::Llm { provider: "Gemini", .. }));
    }

    #[tokio::test]
    async fn test_stalled_server_times_out() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/gemini-2.0-flash:generateContent"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_secs(2))
                    .set_body_json(json!({"candidates": []})),
            )
            .mount(&server)
            .await;

        let client = GeminiChat::new("g-key", "gemini-2.0-flash")
            .with_base_url(server.uri())
            .with_timeout(Duration::from_millis(100));
        let err = client
            .complete(CompletionRequest::prompt("Hi"))
            .await
            .unwrap_err();

        assert!(matches!(&err, Mem0Error::Http(e) if e.is_timeout()));
    }
}
