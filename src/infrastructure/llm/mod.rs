//! LLM provider implementations

mod adapter;
mod claude;
mod dispatcher;
mod factory;
mod gemini;
mod http_client;
pub mod normalizer;
mod openai;

pub use adapter::ProviderAdapter;
pub use claude::ClaudeAdapter;
pub use dispatcher::{Dispatcher, DEFAULT_REQUEST_TIMEOUT};
pub use factory::ProviderAdapterFactory;
pub use gemini::GeminiAdapter;
pub use http_client::{HttpClient, HttpClientTrait, HttpResponse};
pub use openai::OpenAiAdapter;

#[cfg(test)]
pub use http_client::mock;
