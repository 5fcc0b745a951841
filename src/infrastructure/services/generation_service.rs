//! Generation service - the single entry point for turning a role description
//! into a system prompt

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::GatewayConfig;
use crate::domain::{
    Credentials, GatewayError, GenerationRequest, GenerationResult, MetaPromptBuilder,
    ProviderKind,
};
use crate::infrastructure::llm::{normalizer, Dispatcher, HttpClient, HttpClientTrait};

/// Parameters of one generation, as received from the caller
#[derive(Clone, Default)]
pub struct GenerateParams {
    pub role_input: String,
    pub provider: String,
    pub api_key: String,
    pub base_url: Option<String>,
    pub model: String,
}

impl std::fmt::Debug for GenerateParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerateParams")
            .field("role_input_chars", &self.role_input.chars().count())
            .field("provider", &self.provider)
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

/// Provider-agnostic prompt generation gateway
///
/// Holds only immutable policy and a pooled HTTP client; every call carries its own
/// credentials, so concurrent generations share nothing else.
#[derive(Debug, Clone)]
pub struct PromptGateway {
    builder: MetaPromptBuilder,
    dispatcher: Dispatcher,
}

impl PromptGateway {
    /// Create a gateway backed by a pooled reqwest client
    pub fn new(config: &GatewayConfig) -> Result<Self, reqwest::Error> {
        let client = HttpClient::with_timeout(Duration::from_secs(config.request_timeout_secs))?;
        Ok(Self::with_client(config, Arc::new(client)))
    }

    /// Create a gateway over an arbitrary HTTP client
    pub fn with_client(config: &GatewayConfig, client: Arc<dyn HttpClientTrait>) -> Self {
        let dispatcher = Dispatcher::new(client)
            .with_retry(config.retry.clone())
            .with_timeout(Duration::from_secs(config.request_timeout_secs));

        Self {
            builder: MetaPromptBuilder::new(config.max_role_input_chars),
            dispatcher,
        }
    }

    /// Generate a system prompt for the described role.
    ///
    /// Input is validated before anything is built or sent: role description,
    /// then provider, then API key. Any error message that would echo the key has
    /// it replaced with `[REDACTED]`.
    pub async fn generate(&self, params: GenerateParams) -> GenerationResult {
        let api_key = params.api_key.trim().to_string();

        self.run(params, &api_key).await.map_err(|error| {
            let error = error.redact(&api_key);
            if error.kind().is_input_error() {
                debug!(code = %error.kind(), "Generation request rejected");
            } else {
                warn!(code = %error.kind(), message = %error.message, "Generation failed");
            }
            error
        })
    }

    async fn run(&self, params: GenerateParams, api_key: &str) -> GenerationResult {
        if params.role_input.trim().is_empty() {
            return Err(GatewayError::invalid_role_input(
                "Role description must not be empty",
            ));
        }

        let provider: ProviderKind = params.provider.parse()?;

        let model = match params.model.trim() {
            "" => provider.default_model(),
            model => model,
        };
        let credentials = Credentials::new(api_key, model).with_base_url(params.base_url);
        let request = GenerationRequest::new(params.role_input, provider, credentials)?;

        let meta_prompt = self.builder.build(request.role_input())?;
        if meta_prompt.was_truncated() {
            debug!(
                provider = %provider,
                max_chars = self.builder.max_role_input_chars(),
                "Role description truncated"
            );
        }

        let start = Instant::now();
        let body = self
            .dispatcher
            .dispatch(provider, &meta_prompt, request.credentials())
            .await?;
        let prompt = normalizer::extract(provider, &body)?;

        info!(
            provider = %provider,
            model = %request.credentials().model(),
            meta_prompt_chars = meta_prompt.char_count(),
            prompt_chars = prompt.chars().count(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Prompt generated"
        );

        Ok(prompt)
    }
}
