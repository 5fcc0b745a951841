use serde::{Deserialize, Serialize};
use thiserror::Error;

const REDACTED: &str = "[REDACTED]";

/// Secrets shorter than this are only redacted where they stand alone as a token
const MIN_SUBSTRING_SECRET_LEN: usize = 8;

/// Failure categories surfaced at the gateway boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MissingCredential,
    InvalidRoleInput,
    UnsupportedProvider,
    UpstreamAuthFailed,
    UpstreamRateLimited,
    UpstreamTimeout,
    UpstreamUnavailable,
    UpstreamRejected,
    MalformedResponse,
    ContentFiltered,
}

impl ErrorKind {
    /// Wire code reported to callers
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::InvalidRoleInput => "invalid_role_input",
            Self::UnsupportedProvider => "unsupported_provider",
            Self::UpstreamAuthFailed => "upstream_auth_failed",
            Self::UpstreamRateLimited => "upstream_rate_limited",
            Self::UpstreamTimeout => "upstream_timeout",
            Self::UpstreamUnavailable => "upstream_unavailable",
            Self::UpstreamRejected => "upstream_rejected",
            Self::MalformedResponse => "malformed_response",
            Self::ContentFiltered => "content_filtered",
        }
    }

    /// Only transport-level failures are worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::UpstreamTimeout | Self::UpstreamUnavailable)
    }

    /// Whether the failure was detected before any network call
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::MissingCredential | Self::InvalidRoleInput | Self::UnsupportedProvider
        )
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Gateway failure: a kind plus a human-readable message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct GatewayError {
    pub kind: ErrorKind,
    pub message: String,
}

impl GatewayError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn missing_credential(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingCredential, message)
    }

    pub fn invalid_role_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRoleInput, message)
    }

    pub fn unsupported_provider(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnsupportedProvider, message)
    }

    pub fn auth_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UpstreamAuthFailed, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UpstreamRateLimited, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UpstreamTimeout, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UpstreamUnavailable, message)
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UpstreamRejected, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedResponse, message)
    }

    pub fn content_filtered(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ContentFiltered, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    /// Replace occurrences of `secret` in the message.
    ///
    /// Short secrets are matched as whole tokens only, so a one-letter key
    /// does not shred every word containing that letter.
    pub fn redact(mut self, secret: &str) -> Self {
        if secret.is_empty() || !self.message.contains(secret) {
            return self;
        }

        self.message = if secret.chars().count() >= MIN_SUBSTRING_SECRET_LEN {
            self.message.replace(secret, REDACTED)
        } else {
            replace_standalone(&self.message, secret)
        };
        self
    }
}

fn is_token_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

/// Replace `needle` where it is not glued to other token characters
fn replace_standalone(haystack: &str, needle: &str) -> String {
    let mut out = String::with_capacity(haystack.len());
    let mut last = 0;

    for (start, _) in haystack.match_indices(needle) {
        let end = start + needle.len();
        let before = haystack[..start].chars().next_back();
        let after = haystack[end..].chars().next();

        if before.is_some_and(is_token_char) || after.is_some_and(is_token_char) {
            continue;
        }

        out.push_str(&haystack[last..start]);
        out.push_str(REDACTED);
        last = end;
    }

    out.push_str(&haystack[last..]);
    out
}
