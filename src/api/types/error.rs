//! Error responses at the HTTP boundary

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::{ErrorKind, GatewayError};

/// Code reported when the request body itself cannot be read
pub const INVALID_REQUEST_CODE: &str = "invalid_request";

/// Error response body: `{"error": {"code": ..., "message": ...}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// Error detail structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: ApiErrorDetail {
                    code: code.into(),
                    message: message.into(),
                },
            },
        }
    }

    /// Malformed or unreadable request body
    pub fn invalid_request(status: StatusCode, message: impl Into<String>) -> Self {
        Self::new(status, INVALID_REQUEST_CODE, message)
    }

    pub fn code(&self) -> &str {
        &self.response.error.code
    }
}

/// HTTP status for each failure kind
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidRoleInput | ErrorKind::UnsupportedProvider | ErrorKind::MissingCredential => {
            StatusCode::BAD_REQUEST
        }
        ErrorKind::UpstreamAuthFailed => StatusCode::UNAUTHORIZED,
        ErrorKind::UpstreamRateLimited => StatusCode::TOO_MANY_REQUESTS,
        ErrorKind::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
        ErrorKind::UpstreamUnavailable
        | ErrorKind::UpstreamRejected
        | ErrorKind::MalformedResponse => StatusCode::BAD_GATEWAY,
        ErrorKind::ContentFiltered => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        Self::new(status_for(err.kind), err.kind.code(), err.message)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.response.error.code, self.response.error.message
        )
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_error_conversion() {
        let api_err: ApiError = GatewayError::rate_limited("Claude rate limit exceeded").into();

        assert_eq!(api_err.status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(api_err.code(), "upstream_rate_limited");
        assert_eq!(api_err.response.error.message, "Claude rate limit exceeded");
    }

    #[test]
    fn test_error_serialization() {
        let err: ApiError = GatewayError::missing_credential("An API key is required").into();
        let json = serde_json::to_value(&err.response).unwrap();

        assert_eq!(json["error"]["code"], "missing_credential");
        assert_eq!(json["error"]["message"], "An API key is required");
    }

    #[test]
    fn test_status_table() {
        let cases = [
            (ErrorKind::InvalidRoleInput, StatusCode::BAD_REQUEST),
            (ErrorKind::UnsupportedProvider, StatusCode::BAD_REQUEST),
            (ErrorKind::MissingCredential, StatusCode::BAD_REQUEST),
            (ErrorKind::UpstreamAuthFailed, StatusCode::UNAUTHORIZED),
            (ErrorKind::UpstreamRateLimited, StatusCode::TOO_MANY_REQUESTS),
            (ErrorKind::UpstreamTimeout, StatusCode::GATEWAY_TIMEOUT),
            (ErrorKind::UpstreamUnavailable, StatusCode::BAD_GATEWAY),
            (ErrorKind::UpstreamRejected, StatusCode::BAD_GATEWAY),
            (ErrorKind::MalformedResponse, StatusCode::BAD_GATEWAY),
            (ErrorKind::ContentFiltered, StatusCode::UNPROCESSABLE_ENTITY),
        ];

        for (kind, status) in cases {
            assert_eq!(status_for(kind), status, "{}", kind);
        }
    }

    #[test]
    fn test_display() {
        let err = ApiError::invalid_request(StatusCode::BAD_REQUEST, "Invalid JSON syntax");
        assert_eq!(err.to_string(), "invalid_request: Invalid JSON syntax");
    }
}
