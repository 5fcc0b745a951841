use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use super::adapter::{join_url, ProviderAdapter, DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_TEMPERATURE};
use super::http_client::HttpClientTrait;
use crate::domain::{Credentials, MetaPrompt, ProviderKind};

/// Default origin; like the official client, custom base URLs include the version
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";

/// OpenAI-compatible chat completions adapter
#[derive(Debug)]
pub struct OpenAiAdapter {
    client: Arc<dyn HttpClientTrait>,
    auth_header: String,
    base_url: String,
    model: String,
}

impl OpenAiAdapter {
    pub fn new(client: Arc<dyn HttpClientTrait>, credentials: &Credentials) -> Self {
        Self {
            client,
            auth_header: format!("Bearer {}", credentials.api_key()),
            base_url: credentials
                .base_url()
                .unwrap_or(DEFAULT_OPENAI_BASE_URL)
                .to_string(),
            model: credentials.model().to_string(),
        }
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    fn client(&self) -> &Arc<dyn HttpClientTrait> {
        &self.client
    }

    fn endpoint(&self) -> String {
        join_url(&self.base_url, CHAT_COMPLETIONS_PATH)
    }

    fn build_body(&self, meta_prompt: &MetaPrompt) -> Value {
        let request = OpenAiRequest {
            model: &self.model,
            messages: vec![OpenAiMessage {
                role: "user",
                content: meta_prompt.text(),
            }],
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            stream: false,
        };

        serde_json::json!(request)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }
}

// OpenAI API types

#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAiMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct OpenAiMessage<'a> {
    role: &'static str,
    content: &'a str,
}
