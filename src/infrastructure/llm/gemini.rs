use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use super::adapter::{
    classify_status, join_url, upstream_error_detail, ProviderAdapter, DEFAULT_MAX_OUTPUT_TOKENS,
    DEFAULT_TEMPERATURE,
};
use super::http_client::{HttpClientTrait, HttpResponse};
use crate::domain::{Credentials, GatewayError, MetaPrompt, ProviderKind};

const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Markers Google puts in a 400 body when the key itself is bad
const INVALID_KEY_MARKERS: [&str; 2] = ["API_KEY_INVALID", "API key not valid"];

/// Google Generative Language API adapter. The key travels as the `key` query
/// parameter and never appears in `endpoint()`.
#[derive(Debug)]
pub struct GeminiAdapter {
    client: Arc<dyn HttpClientTrait>,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiAdapter {
    pub fn new(client: Arc<dyn HttpClientTrait>, credentials: &Credentials) -> Self {
        let model = credentials.model();

        Self {
            client,
            api_key: credentials.api_key().to_string(),
            base_url: credentials
                .base_url()
                .unwrap_or(DEFAULT_GEMINI_BASE_URL)
                .to_string(),
            model: model.strip_prefix("models/").unwrap_or(model).to_string(),
        }
    }
}

#[async_trait]
impl ProviderAdapter for GeminiAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    fn client(&self) -> &Arc<dyn HttpClientTrait> {
        &self.client
    }

    fn endpoint(&self) -> String {
        join_url(
            &self.base_url,
            &format!("/v1beta/models/{}:generateContent", self.model),
        )
    }

    fn build_body(&self, meta_prompt: &MetaPrompt) -> Value {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiPart {
                    text: meta_prompt.text(),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: DEFAULT_TEMPERATURE,
                max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            },
        };

        serde_json::json!(request)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![("Content-Type", "application/json")]
    }

    fn query(&self) -> Vec<(&str, &str)> {
        vec![("key", self.api_key.as_str())]
    }

    fn map_error(&self, response: &HttpResponse) -> GatewayError {
        // Google reports a bad key as 400 rather than 401
        if response.status == 400
            && INVALID_KEY_MARKERS
                .iter()
                .any(|marker| response.body.contains(marker))
        {
            return GatewayError::auth_failed(format!(
                "Gemini API key is invalid: {}",
                upstream_error_detail(&response.body)
            ));
        }

        classify_status(self.kind(), response)
    }
}

// Gemini API types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    role: &'static str,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}
