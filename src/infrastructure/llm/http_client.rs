use std::time::Duration;

use async_trait::async_trait;

use crate::domain::GatewayError;

/// Raw upstream reply; status classification is left to the adapters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for HTTP client operations (for mocking)
#[async_trait]
pub trait HttpClientTrait: Send + Sync + std::fmt::Debug {
    /// POST a JSON body. Transport failures are classified here; any HTTP
    /// status, success or not, comes back as an `HttpResponse`.
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        query: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, GatewayError>;
}

/// Real HTTP client using reqwest
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;

        Ok(Self { client })
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify a reqwest failure. The URL is dropped because it may carry a key.
fn classify_transport_error(error: reqwest::Error) -> GatewayError {
    let timed_out = error.is_timeout();
    let error = error.without_url();

    if timed_out {
        GatewayError::timeout(format!("Request timed out: {}", error))
    } else if error.is_connect() {
        GatewayError::unavailable(format!("Connection failed: {}", error))
    } else {
        GatewayError::unavailable(format!("Request failed: {}", error))
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        query: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, GatewayError> {
        let mut request = self.client.post(url);

        for (key, value) in headers {
            request = request.header(key, value);
        }

        if !query.is_empty() {
            request = request.query(&query);
        }

        let response = request
            .json(body)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(classify_transport_error)?;

        Ok(HttpResponse { status, body })
    }
}
