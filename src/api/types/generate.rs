//! Request and response bodies for prompt generation

use serde::{Deserialize, Serialize};

use crate::infrastructure::services::GenerateParams;

/// Body of `POST /api/generate`
///
/// Every field defaults to empty so that missing values reach the gateway's own
/// validation and come back with a specific error code.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct GenerateRequest {
    pub role_input: String,
    pub provider: String,
    pub api_key: String,
    pub base_url: Option<String>,
    pub model: String,
}

impl std::fmt::Debug for GenerateRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerateRequest")
            .field("role_input_chars", &self.role_input.chars().count())
            .field("provider", &self.provider)
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl From<GenerateRequest> for GenerateParams {
    fn from(request: GenerateRequest) -> Self {
        Self {
            role_input: request.role_input,
            provider: request.provider,
            api_key: request.api_key,
            base_url: request.base_url,
            model: request.model,
        }
    }
}

/// Successful generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub prompt: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default_to_empty() {
        let request: GenerateRequest =
            serde_json::from_str(r#"{"role_input":"translator","provider":"openai"}"#).unwrap();

        assert_eq!(request.role_input, "translator");
        assert_eq!(request.api_key, "");
        assert_eq!(request.model, "");
        assert!(request.base_url.is_none());
    }

    #[test]
    fn test_null_base_url() {
        let request: GenerateRequest = serde_json::from_str(
            r#"{"role_input":"r","provider":"gemini","api_key":"k","base_url":null,"model":"gemini-2.0-flash"}"#,
        )
        .unwrap();

        let params = GenerateParams::from(request);
        assert!(params.base_url.is_none());
        assert_eq!(params.model, "gemini-2.0-flash");
    }

    #[test]
    fn test_debug_hides_key() {
        let request = GenerateRequest {
            api_key: "sk-secret".to_string(),
            ..Default::default()
        };
        assert!(!format!("{:?}", request).contains("sk-secret"));
    }
}
