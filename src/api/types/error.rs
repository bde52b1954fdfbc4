//! Structured error envelope returned by the gateway

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Error categories exposed to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorType {
    InvalidRequestError,
    AuthenticationError,
    BackendError,
    ServerError,
}

impl std::fmt::Display for ApiErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRequestError => write!(f, "invalid_request_error"),
            Self::AuthenticationError => write!(f, "authentication_error"),
            Self::BackendError => write!(f, "backend_error"),
            Self::ServerError => write!(f, "server_error"),
        }
    }
}

/// Error response body: `{ "error": { ... } }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// Error detail structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: ApiErrorType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_status: Option<u16>,
}

/// Machine-readable error codes
pub mod codes {
    pub const MISSING_AUTHORIZATION_TOKEN: &str = "missing_authorization_token";
    pub const BACKEND_CALL_FAILED: &str = "backend_call_failed";
    pub const BACKEND_UNREACHABLE: &str = "backend_unreachable";
    pub const INVALID_BACKEND_RESPONSE: &str = "invalid_backend_response";
    pub const INVALID_JSON_BODY: &str = "invalid_json_body";
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: StatusCode, error_type: ApiErrorType, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: ApiErrorDetail {
                    message: message.into(),
                    error_type,
                    code: None,
                    backend_status: None,
                },
            },
        }
    }

    /// Add error code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.response.error.code = Some(code.into());
        self
    }

    /// Attach the status the backend answered with
    pub fn with_backend_status(mut self, status: u16) -> Self {
        self.response.error.backend_status = Some(status);
        self
    }

    /// Bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ApiErrorType::InvalidRequestError, message)
    }

    /// No usable bearer token on an authenticated route
    pub fn missing_token() -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ApiErrorType::AuthenticationError,
            DomainError::MissingCredential.to_string(),
        )
        .with_code(codes::MISSING_AUTHORIZATION_TOKEN)
    }

    /// Backend answered with a non-success status; that status is kept
    pub fn backend(status: u16, message: impl Into<String>) -> Self {
        let http_status = StatusCode::from_u16(status)
            .ok()
            .filter(|s| s.is_client_error() || s.is_server_error())
            .unwrap_or(StatusCode::BAD_GATEWAY);

        Self::new(http_status, ApiErrorType::BackendError, message)
            .with_code(codes::BACKEND_CALL_FAILED)
            .with_backend_status(status)
    }

    /// Backend could not be reached or returned something unusable
    pub fn bad_gateway(message: impl Into<String>, code: &str) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, ApiErrorType::BackendError, message).with_code(code)
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, ApiErrorType::ServerError, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::MissingCredential => Self::missing_token(),
            DomainError::Backend { status, message } => Self::backend(status, message),
            DomainError::Transport { message } => {
                Self::bad_gateway(message, codes::BACKEND_UNREACHABLE)
            }
            DomainError::InvalidResponse { message } => {
                Self::bad_gateway(message, codes::INVALID_BACKEND_RESPONSE)
            }
            DomainError::Validation { message } => Self::bad_request(message),
            DomainError::Configuration { message } | DomainError::Internal { message } => {
                Self::internal(message)
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.response.error.error_type, self.response.error.message
        )
    }
}

impl std::error::Error for ApiError {}
