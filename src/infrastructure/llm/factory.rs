use std::sync::Arc;

use super::adapter::ProviderAdapter;
use super::http_client::HttpClientTrait;
use super::{ClaudeAdapter, GeminiAdapter, OpenAiAdapter};
use crate::domain::{Credentials, ProviderKind};

/// Factory for per-call provider adapters
#[derive(Debug)]
pub struct ProviderAdapterFactory;

impl ProviderAdapterFactory {
    /// Build the adapter for `kind`, bound to one call's credentials
    pub fn create(
        kind: ProviderKind,
        client: Arc<dyn HttpClientTrait>,
        credentials: &Credentials,
    ) -> Box<dyn ProviderAdapter> {
        match kind {
            ProviderKind::OpenAi => Box::new(OpenAiAdapter::new(client, credentials)),
            ProviderKind::Claude => Box::new(ClaudeAdapter::new(client, credentials)),
            ProviderKind::Gemini => Box::new(GeminiAdapter::new(client, credentials)),
        }
    }
}
