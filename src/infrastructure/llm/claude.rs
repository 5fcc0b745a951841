use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use super::adapter::{join_url, ProviderAdapter, DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_TEMPERATURE};
use super::http_client::HttpClientTrait;
use crate::domain::{Credentials, MetaPrompt, ProviderKind};

const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
const MESSAGES_PATH: &str = "/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic messages API adapter
#[derive(Debug)]
pub struct ClaudeAdapter {
    client: Arc<dyn HttpClientTrait>,
    api_key: String,
    base_url: String,
    model: String,
}

impl ClaudeAdapter {
    pub fn new(client: Arc<dyn HttpClientTrait>, credentials: &Credentials) -> Self {
        Self {
            client,
            api_key: credentials.api_key().to_string(),
            base_url: credentials
                .base_url()
                .unwrap_or(DEFAULT_ANTHROPIC_BASE_URL)
                .to_string(),
            model: credentials.model().to_string(),
        }
    }
}

#[async_trait]
impl ProviderAdapter for ClaudeAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Claude
    }

    fn client(&self) -> &Arc<dyn HttpClientTrait> {
        &self.client
    }

    fn endpoint(&self) -> String {
        join_url(&self.base_url, MESSAGES_PATH)
    }

    fn build_body(&self, meta_prompt: &MetaPrompt) -> Value {
        let request = AnthropicRequest {
            model: &self.model,
            max_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            messages: vec![AnthropicMessage {
                role: "user",
                content: meta_prompt.text(),
            }],
        };

        serde_json::json!(request)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("x-api-key", self.api_key.as_str()),
            ("anthropic-version", ANTHROPIC_VERSION),
            ("Content-Type", "application/json"),
        ]
    }
}

// Anthropic API types

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorKind, MetaPromptBuilder};
    use crate::infrastructure::llm::http_client::mock::MockHttpClient;

    const TEST_URL: &str = "https://api.anthropic.com/v1/messages";

    fn meta() -> MetaPrompt {
        MetaPromptBuilder::default().build("contract lawyer").unwrap()
    }

    #[tokio::test]
    async fn test_claude_send_uses_api_key_header() {
        let mock_response = serde_json::json!({
            "id": "msg_123",
            "type": "message",
            "role": "assistant",
            "model": "claude-sonnet-4-20250514",
            "content": [{ "type": "text", "text": "# Contract Lawyer" }],
            "stop_reason": "end_turn",
            "usage": { "input_tokens": 12, "output_tokens": 10 }
        });

        let client = Arc::new(MockHttpClient::new().with_json(TEST_URL, 200, mock_response.clone()));
        let creds = Credentials::new("sk-ant-test", "claude-sonnet-4-20250514");

        let body = ClaudeAdapter::new(client.clone(), &creds)
            .send(&meta())
            .await
            .unwrap();
        assert_eq!(body, mock_response);

        let call = &client.calls()[0];
        assert_eq!(call.header("x-api-key"), Some("sk-ant-test"));
        assert_eq!(call.header("anthropic-version"), Some("2023-06-01"));
        assert_eq!(call.header("Authorization"), None);
    }

    #[test]
    fn test_claude_request_shape() {
        let creds = Credentials::new("k", "claude-3-5-haiku-20241022");
        let meta = meta();
        let body = ClaudeAdapter::new(Arc::new(MockHttpClient::new()), &creds).build_body(&meta);

        assert_eq!(body["model"], "claude-3-5-haiku-20241022");
        assert_eq!(body["max_tokens"], 4096);
        assert!(body.get("system").is_none());
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], meta.text());
    }

    #[test]
    fn test_claude_base_url_with_version_segment() {
        let creds = Credentials::new("k", "m").with_base_url(Some("https://relay.example.com/v1"));
        let adapter = ClaudeAdapter::new(Arc::new(MockHttpClient::new()), &creds);

        assert_eq!(adapter.endpoint(), "https://relay.example.com/v1/messages");
    }

    #[test]
    fn test_claude_custom_base_url() {
        let creds = Credentials::new("k", "m").with_base_url(Some("http://localhost:8081/"));
        let adapter = ClaudeAdapter::new(Arc::new(MockHttpClient::new()), &creds);

        assert_eq!(adapter.endpoint(), "http://localhost:8081/v1/messages");
    }

    #[tokio::test]
    async fn test_claude_overloaded_is_unavailable() {
        let client = Arc::new(MockHttpClient::new().with_status(
            TEST_URL,
            529,
            r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#,
        ));
        let creds = Credentials::new("k", "m");

        let err = ClaudeAdapter::new(client, &creds)
            .send(&meta())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UpstreamUnavailable);
        assert!(err.message.contains("Overloaded"));
    }
}
