//! Provider-independent generation types

mod provider;
mod request;
mod retry;

pub use provider::ProviderKind;
pub use request::{GenerationRequest, GenerationResult};
pub use retry::RetryConfig;
