use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::generate;
use super::health;
use super::middleware::{logging_middleware, security_headers_middleware, MAX_BODY_SIZE};
use super::state::AppState;

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/live", get(health::live_check))
        .route("/api/health", get(health::health_check))
        // Generation
        .route("/api/generate", post(generate::generate))
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::api::state::GenerationServiceTrait;
    use crate::config::GatewayConfig;
    use crate::domain::{GatewayError, GenerationResult, RetryConfig};
    use crate::infrastructure::llm::mock::MockHttpClient;
    use crate::infrastructure::services::{GenerateParams, PromptGateway};

    /// Returns a fixed outcome and remembers what it was asked
    struct StubGenerationService {
        outcome: GenerationResult,
        seen: Mutex<Vec<GenerateParams>>,
    }

    impl StubGenerationService {
        fn new(outcome: GenerationResult) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait::async_trait]
    impl GenerationServiceTrait for StubGenerationService {
        async fn generate(&self, params: GenerateParams) -> GenerationResult {
            self.seen.lock().unwrap().push(params);
            self.outcome.clone()
        }
    }

    fn app(service: Arc<dyn GenerationServiceTrait>) -> Router {
        create_router(AppState::new(service))
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_generate_success() {
        let service = StubGenerationService::new(Ok("# Translator".to_string()));
        let body = json!({
            "role_input": "translator",
            "provider": "openai",
            "api_key": "sk-test",
            "base_url": "https://proxy.example.com/v1",
            "model": "gpt-4o"
        });

        let response = app(service.clone())
            .oneshot(post_json("/api/generate", &body.to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await, json!({ "prompt": "# Translator" }));

        let seen = service.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].provider, "openai");
        assert_eq!(seen[0].base_url.as_deref(), Some("https://proxy.example.com/v1"));
    }

    #[tokio::test]
    async fn test_generate_error_mapping() {
        let cases = [
            (GatewayError::invalid_role_input("empty"), StatusCode::BAD_REQUEST, "invalid_role_input"),
            (GatewayError::auth_failed("bad key"), StatusCode::UNAUTHORIZED, "upstream_auth_failed"),
            (GatewayError::timeout("slow"), StatusCode::GATEWAY_TIMEOUT, "upstream_timeout"),
            (GatewayError::content_filtered("blocked"), StatusCode::UNPROCESSABLE_ENTITY, "content_filtered"),
        ];

        for (error, status, code) in cases {
            let message = error.message.clone();
            let service = StubGenerationService::new(Err(error));

            let response = app(service)
                .oneshot(post_json("/api/generate", r#"{"role_input":"x","provider":"openai","api_key":"k"}"#))
                .await
                .unwrap();

            assert_eq!(response.status(), status);
            let body = read_json(response).await;
            assert_eq!(body["error"]["code"], code);
            assert_eq!(body["error"]["message"], message);
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_invalid_request() {
        let service = StubGenerationService::new(Ok(String::new()));

        let response = app(service.clone())
            .oneshot(post_json("/api/generate", "{\"role_input\": "))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_json(response).await["error"]["code"], "invalid_request");
        assert!(service.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_key_through_real_gateway() {
        let client = Arc::new(MockHttpClient::new());
        let config = GatewayConfig {
            retry: RetryConfig::disabled(),
            ..Default::default()
        };
        let gateway = Arc::new(PromptGateway::with_client(&config, client.clone()));

        let response = app(gateway)
            .oneshot(post_json(
                "/api/generate",
                r#"{"role_input":"translator","provider":"gemini","model":"gemini-2.0-flash"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_json(response).await["error"]["code"], "missing_credential");
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let service = StubGenerationService::new(Ok(String::new()));

        for uri in ["/health", "/api/health"] {
            let response = app(service.clone())
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            let body = read_json(response).await;
            assert_eq!(body["status"], "ok");
            assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        }

        let response = app(service)
            .oneshot(Request::builder().uri("/live").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_cors_preflight_allowed() {
        let service = StubGenerationService::new(Ok(String::new()));

        let response = app(service)
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/generate")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.status().is_success());
        assert!(response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[tokio::test]
    async fn test_security_headers_on_api_responses() {
        let service = StubGenerationService::new(Ok(String::new()));

        let response = app(service)
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    }
}
