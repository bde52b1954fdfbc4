use thiserror::Error;

use crate::domain::account::AccountValidationError;
use crate::domain::team::TeamValidationError;

/// Core domain errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    #[error("No authorization token")]
    MissingCredential,

    #[error("Backend call failed with status {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("Backend unreachable: {message}")]
    Transport { message: String },

    #[error("Invalid backend response: {message}")]
    InvalidResponse { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn backend(status: u16, message: impl Into<String>) -> Self {
        Self::Backend {
            status,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Status reported by the backend, when the failure came from it
    pub fn backend_status(&self) -> Option<u16> {
        match self {
            Self::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<AccountValidationError> for DomainError {
    fn from(err: AccountValidationError) -> Self {
        Self::validation(err.to_string())
    }
}

impl From<TeamValidationError> for DomainError {
    fn from(err: TeamValidationError) -> Self {
        Self::validation(err.to_string())
    }
}
