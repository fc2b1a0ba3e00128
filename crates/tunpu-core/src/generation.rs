use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::settings::GenerationSettings;

/// Who said a line of chat history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// One line of history passed to the generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

/// Every way a generation attempt can fail. Callers collapse all of them
/// into the configured fallback message.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("no API key configured")]
    MissingApiKey,
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("empty response")]
    EmptyResponse,
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, history: &[Turn]) -> Result<String, GenerationError>;
}

/// Single attempt, no retry. Failures are logged and replaced by `fallback`.
pub async fn generate_or_fallback(
    generator: &dyn TextGenerator,
    prompt: &str,
    history: &[Turn],
    fallback: &str,
) -> String {
    match generator.generate(prompt, history).await {
        Ok(text) => text,
        Err(err) => {
            warn!(error = %err, "text generation failed, using fallback");
            fallback.to_string()
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: Content,
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<Role>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl Content {
    fn text(role: Option<Role>, text: &str) -> Self {
        Self {
            role,
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

impl GenerateContentRequest {
    fn new(system_instruction: &str, prompt: &str, history: &[Turn]) -> Self {
        let mut contents: Vec<Content> = history
            .iter()
            .map(|turn| Content::text(Some(turn.role), &turn.text))
            .collect();
        contents.push(Content::text(Some(Role::User), prompt));

        Self {
            system_instruction: Content::text(None, system_instruction),
            contents,
        }
    }
}

impl GenerateContentResponse {
    fn into_text(self) -> Option<String> {
        let text: String = self
            .candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .map(|part| part.text)
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

/// Gemini `generateContent` client.
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
    system_instruction: String,
}

impl GeminiClient {
    pub fn new(settings: &GenerationSettings) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            api_key: settings.api_key.clone(),
            system_instruction: settings.system_instruction.clone(),
        })
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str, history: &[Turn]) -> Result<String, GenerationError> {
        if self.api_key.is_empty() {
            return Err(GenerationError::MissingApiKey);
        }

        let request_body = GenerateContentRequest::new(&self.system_instruction, prompt, history);
        debug!(model = %self.model, turns = request_body.contents.len(), "sending generation request");

        let response = self
            .client
            .post(self.url())
            .query(&[("key", self.api_key.as_str())])
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api { status, body });
        }

        let body: GenerateContentResponse = response.json().await?;
        body.into_text().ok_or(GenerationError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Failing;

    #[async_trait]
    impl TextGenerator for Failing {
        async fn generate(&self, _prompt: &str, _history: &[Turn]) -> Result<String, GenerationError> {
            Err(GenerationError::Api {
                status: 503,
                body: "overloaded".to_string(),
            })
        }
    }

    struct Echo;

    #[async_trait]
    impl TextGenerator for Echo {
        async fn generate(&self, prompt: &str, history: &[Turn]) -> Result<String, GenerationError> {
            Ok(format!("{}:{}", history.len(), prompt))
        }
    }

    #[test]
    fn test_request_body_shape() {
        let history = vec![
            Turn {
                role: Role::User,
                text: "你好".to_string(),
            },
            Turn {
                role: Role::Model,
                text: "您好！".to_string(),
            },
        ];
        let request = GenerateContentRequest::new("be brief", "怎么走？", &history);
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value,
            json!({
                "systemInstruction": { "parts": [{ "text": "be brief" }] },
                "contents": [
                    { "role": "user", "parts": [{ "text": "你好" }] },
                    { "role": "model", "parts": [{ "text": "您好！" }] },
                    { "role": "user", "parts": [{ "text": "怎么走？" }] }
                ]
            })
        );
    }

    #[test]
    fn test_response_text_is_joined() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "往前" }, { "text": "走" }] }
            }]
        }))
        .unwrap();

        assert_eq!(response.into_text().as_deref(), Some("往前走"));
    }

    #[test]
    fn test_blank_response_is_empty() {
        let no_candidates: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(no_candidates.into_text(), None);

        let blank: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [{ "text": "  " }] } }]
        }))
        .unwrap();
        assert_eq!(blank.into_text(), None);
    }

    #[tokio::test]
    async fn test_fallback_replaces_failure() {
        let text = generate_or_fallback(&Failing, "hi", &[], "网络开小差了，请稍后再试。").await;
        assert_eq!(text, "网络开小差了，请稍后再试。");
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let text = generate_or_fallback(&Echo, "hi", &[], "fallback").await;
        assert_eq!(text, "0:hi");
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_request() {
        let settings = GenerationSettings {
            api_key: String::new(),
            ..GenerationSettings::default()
        };
        let client = GeminiClient::new(&settings).unwrap();

        let result = client.generate("hi", &[]).await;
        assert!(matches!(result, Err(GenerationError::MissingApiKey)));
    }

    #[test]
    fn test_url_trims_trailing_slash() {
        let settings = GenerationSettings {
            endpoint: "https://example.test/v1beta/".to_string(),
            model: "demo".to_string(),
            ..GenerationSettings::default()
        };
        let client = GeminiClient::new(&settings).unwrap();
        assert_eq!(client.url(), "https://example.test/v1beta/models/demo:generateContent");
    }
}
