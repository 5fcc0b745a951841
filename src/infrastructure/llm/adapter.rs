//! Common capability shared by every provider adapter

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::http_client::{HttpClientTrait, HttpResponse};
use crate::domain::{GatewayError, MetaPrompt, ProviderKind};
use crate::infrastructure::logging::redact_json_sensitive_fields;

/// Upstream error details are cut to this many characters
const MAX_ERROR_DETAIL_CHARS: usize = 300;

/// Temperature sent to every provider; low for stable, complete output
pub(crate) const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Output token ceiling sent to every provider
pub(crate) const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 4096;

/// One provider's wire protocol: request shape, auth placement and error mapping.
///
/// `send` performs exactly one HTTP call and returns the decoded body untouched;
/// text extraction belongs to the normalizer.
#[async_trait]
pub trait ProviderAdapter: Send + Sync + std::fmt::Debug {
    fn kind(&self) -> ProviderKind;

    fn client(&self) -> &Arc<dyn HttpClientTrait>;

    /// Fully resolved endpoint URL, without auth query parameters
    fn endpoint(&self) -> String;

    fn build_body(&self, meta_prompt: &MetaPrompt) -> Value;

    fn headers(&self) -> Vec<(&str, &str)>;

    fn query(&self) -> Vec<(&str, &str)> {
        Vec::new()
    }

    /// Classify a non-2xx reply
    fn map_error(&self, response: &HttpResponse) -> GatewayError {
        classify_status(self.kind(), response)
    }

    async fn send(&self, meta_prompt: &MetaPrompt) -> Result<Value, GatewayError> {
        let url = self.endpoint();
        let body = self.build_body(meta_prompt);

        let response = self
            .client()
            .post_json(&url, self.headers(), self.query(), &body)
            .await?;

        if !response.is_success() {
            return Err(self.map_error(&response));
        }

        serde_json::from_str(&response.body).map_err(|e| {
            GatewayError::malformed(format!(
                "{} returned a body that is not JSON: {}",
                self.kind().display_name(),
                e
            ))
        })
    }
}

/// Default status-code table shared by all providers
pub(crate) fn classify_status(kind: ProviderKind, response: &HttpResponse) -> GatewayError {
    let name = kind.display_name();
    let status = response.status;
    let detail = upstream_error_detail(&response.body);

    match status {
        401 | 403 => GatewayError::auth_failed(format!(
            "{} API key is invalid or not authorized (HTTP {}): {}",
            name, status, detail
        )),
        429 => GatewayError::rate_limited(format!(
            "{} rate limit exceeded, retry later: {}",
            name, detail
        )),
        408 => GatewayError::timeout(format!("{} request timed out (HTTP 408)", name)),
        400..=499 => GatewayError::rejected(format!(
            "{} rejected the request (HTTP {}): {}",
            name, status, detail
        )),
        _ => GatewayError::unavailable(format!(
            "{} service error (HTTP {}): {}",
            name, status, detail
        )),
    }
}

/// Pull a readable message out of an upstream error body.
///
/// All three providers nest it under `error.message`; anything else falls back to
/// the raw body, with credential-looking JSON fields blanked.
pub(crate) fn upstream_error_detail(body: &str) -> String {
    let parsed = serde_json::from_str::<Value>(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|json| json.get("error"))
        .and_then(|error| {
            error
                .get("message")
                .and_then(Value::as_str)
                .or_else(|| error.as_str())
        })
        .unwrap_or(body)
        .trim();

    if message.is_empty() {
        return "no error details".to_string();
    }

    truncate_chars(&redact_json_sensitive_fields(message), MAX_ERROR_DETAIL_CHARS)
}

fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

/// Append `path` to `base` without doubled slashes or a repeated first segment
pub(crate) fn join_url(base: &str, path: &str) -> String {
    let base = base.trim().trim_end_matches('/');
    let path = path.trim_start_matches('/');

    let path = match path.split_once('/') {
        Some((first, rest)) if base.ends_with(&format!("/{}", first)) => rest,
        _ => path,
    };

    format!("{}/{}", base, path)
}
