//! Meta-prompt construction for role system-prompt generation

mod template;

pub use template::{MetaPrompt, MetaPromptBuilder, DEFAULT_MAX_ROLE_INPUT_CHARS};
