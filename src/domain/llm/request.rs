use super::ProviderKind;
use crate::domain::{Credentials, GatewayError};

/// Outcome of a single generation: the prompt text or a classified failure
pub type GenerationResult = Result<String, GatewayError>;

/// A validated generation request
///
/// Constructed only through [`GenerationRequest::new`], which rejects blank role
/// input and blank API keys before anything touches the network.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    role_input: String,
    provider: ProviderKind,
    credentials: Credentials,
}

impl GenerationRequest {
    pub fn new(
        role_input: impl Into<String>,
        provider: ProviderKind,
        credentials: Credentials,
    ) -> Result<Self, GatewayError> {
        let role_input = role_input.into();

        if role_input.trim().is_empty() {
            return Err(GatewayError::invalid_role_input(
                "Role description must not be empty",
            ));
        }

        if !credentials.has_api_key() {
            return Err(GatewayError::missing_credential(format!(
                "An API key is required for {}",
                provider.display_name()
            )));
        }

        Ok(Self {
            role_input,
            provider,
            credentials,
        })
    }

    pub fn role_input(&self) -> &str {
        &self.role_input
    }

    pub fn provider(&self) -> ProviderKind {
        self.provider
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;

    #[test]
    fn test_valid_request() {
        let request = GenerationRequest::new(
            "translation expert",
            ProviderKind::Claude,
            Credentials::new("key", "claude-sonnet-4-20250514"),
        )
        .unwrap();

        assert_eq!(request.role_input(), "translation expert");
        assert_eq!(request.provider(), ProviderKind::Claude);
        assert_eq!(request.credentials().model(), "claude-sonnet-4-20250514");
    }

    #[test]
    fn test_blank_role_input_rejected() {
        let err = GenerationRequest::new(
            " \n\t ",
            ProviderKind::OpenAi,
            Credentials::new("key", "gpt-4o"),
        )
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidRoleInput);
    }

    #[test]
    fn test_missing_key_rejected() {
        let err = GenerationRequest::new(
            "poet",
            ProviderKind::Gemini,
            Credentials::new("", "gemini-2.0-flash"),
        )
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::MissingCredential);
        assert!(err.message.contains("Gemini"));
    }
}
