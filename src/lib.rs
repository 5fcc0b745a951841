//! Role Prompt Gateway
//!
//! Turns a short role description into a structured, injection-resistant system
//! prompt by delegating generation to one of several LLM providers:
//! - OpenAI-compatible chat completions
//! - Anthropic messages
//! - Google Gemini generateContent

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::{ErrorKind, GatewayError, GenerationResult, ProviderKind};
pub use infrastructure::services::{GenerateParams, PromptGateway};
