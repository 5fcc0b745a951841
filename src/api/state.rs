//! Application state for shared services

use std::sync::Arc;

use crate::domain::GenerationResult;
use crate::infrastructure::services::{GenerateParams, PromptGateway};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub generation_service: Arc<dyn GenerationServiceTrait>,
}

impl AppState {
    pub fn new(generation_service: Arc<dyn GenerationServiceTrait>) -> Self {
        Self { generation_service }
    }
}

/// Trait for prompt generation
#[async_trait::async_trait]
pub trait GenerationServiceTrait: Send + Sync {
    async fn generate(&self, params: GenerateParams) -> GenerationResult;
}

#[async_trait::async_trait]
impl GenerationServiceTrait for PromptGateway {
    async fn generate(&self, params: GenerateParams) -> GenerationResult {
        PromptGateway::generate(self, params).await
    }
}
