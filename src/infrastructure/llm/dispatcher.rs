//! Single-request dispatch with a bounded timeout and transport-only retries

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::{debug, warn};

use super::factory::ProviderAdapterFactory;
use super::http_client::HttpClientTrait;
use crate::domain::{Credentials, GatewayError, MetaPrompt, ProviderKind, RetryConfig};

/// Default per-attempt ceiling covering connect and response
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

/// Sends one meta-prompt to one provider
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: Arc<dyn HttpClientTrait>,
    retry: RetryConfig,
    timeout: Duration,
}

impl Dispatcher {
    pub fn new(client: Arc<dyn HttpClientTrait>) -> Self {
        Self {
            client,
            retry: RetryConfig::default(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send `meta_prompt` and return the decoded response body.
    ///
    /// Attempts run sequentially. Only timeouts and unavailability are retried;
    /// after the last attempt the last failure is returned.
    pub async fn dispatch(
        &self,
        provider: ProviderKind,
        meta_prompt: &MetaPrompt,
        credentials: &Credentials,
    ) -> Result<Value, GatewayError> {
        let adapter = ProviderAdapterFactory::create(provider, self.client.clone(), credentials);
        let max_attempts = self.retry.max_attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;
            let start = Instant::now();

            let outcome = match tokio::time::timeout(self.timeout, adapter.send(meta_prompt)).await {
                Ok(result) => result,
                Err(_) => Err(GatewayError::timeout(format!(
                    "{} did not respond within {}s",
                    provider.display_name(),
                    self.timeout.as_secs_f32()
                ))),
            };

            let latency_ms = start.elapsed().as_millis() as u64;

            match outcome {
                Ok(body) => {
                    debug!(
                        provider = %provider,
                        model = %credentials.model(),
                        attempt,
                        latency_ms,
                        "Provider call succeeded"
                    );
                    return Ok(body);
                }
                Err(error) if error.is_retryable() && attempt < max_attempts => {
                    let delay = self.retry.delay_for_retry(attempt - 1);
                    warn!(
                        provider = %provider,
                        model = %credentials.model(),
                        attempt,
                        latency_ms,
                        error_code = %error.kind(),
                        delay_ms = delay.as_millis() as u64,
                        "Provider call failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(error) => {
                    warn!(
                        provider = %provider,
                        model = %credentials.model(),
                        attempt,
                        latency_ms,
                        error_code = %error.kind(),
                        "Provider call failed"
                    );
                    return Err(error);
                }
            }
        }
    }
}
