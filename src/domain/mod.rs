//! Domain layer - Generation types, meta-prompt construction and failure taxonomy

pub mod credentials;
pub mod error;
pub mod llm;
pub mod prompt;

pub use credentials::Credentials;
pub use error::{ErrorKind, GatewayError};
pub use llm::{GenerationRequest, GenerationResult, ProviderKind, RetryConfig};
pub use prompt::{MetaPrompt, MetaPromptBuilder, DEFAULT_MAX_ROLE_INPUT_CHARS};
